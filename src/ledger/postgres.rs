//! Postgres-backed [`WalletStore`], mirroring the teacher's
//! `impl Trait for Arc<Client>` repository pattern and table-name
//! constants.

use super::store::WalletStore;
use crate::domain::{ReferenceType, Transaction, Wallet};
use crate::error::ErrorKind;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio_postgres::Client;
use uuid::Uuid;

#[rustfmt::skip]
pub const WALLETS: &str = "wallets";
#[rustfmt::skip]
pub const TRANSACTIONS: &str = "transactions";

pub const DDL: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ", WALLETS, " (
        user_id UUID PRIMARY KEY,
        balance NUMERIC(38, 18) NOT NULL DEFAULT 0,
        version BIGINT NOT NULL DEFAULT 1,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    CREATE TABLE IF NOT EXISTS ", TRANSACTIONS, " (
        id UUID PRIMARY KEY,
        wallet_user_id UUID NOT NULL REFERENCES ", WALLETS, "(user_id),
        amount NUMERIC(38, 18) NOT NULL,
        balance_after NUMERIC(38, 18) NOT NULL,
        reference_type TEXT NOT NULL,
        reference_id UUID,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );"
);

fn map_pg_err(err: tokio_postgres::Error) -> ErrorKind {
    ErrorKind::Internal(err.to_string())
}

fn reference_type_to_str(r: ReferenceType) -> &'static str {
    match r {
        ReferenceType::Deposit => "deposit",
        ReferenceType::Withdrawal => "withdrawal",
        ReferenceType::PokerBuyIn => "poker-buy-in",
        ReferenceType::PokerPayout => "poker-payout",
        ReferenceType::RouletteBet => "roulette-bet",
        ReferenceType::RoulettePayout => "roulette-payout",
    }
}

fn reference_type_from_str(s: &str) -> ReferenceType {
    match s {
        "deposit" => ReferenceType::Deposit,
        "withdrawal" => ReferenceType::Withdrawal,
        "poker-buy-in" => ReferenceType::PokerBuyIn,
        "poker-payout" => ReferenceType::PokerPayout,
        "roulette-bet" => ReferenceType::RouletteBet,
        "roulette-payout" => ReferenceType::RoulettePayout,
        other => panic!("unknown reference_type in storage: {other}"),
    }
}

#[async_trait]
impl WalletStore for Arc<Client> {
    async fn create(&self, user_id: Uuid) -> Result<Wallet, ErrorKind> {
        let row = self
            .query_one(
                const_format::concatcp!(
                    "INSERT INTO ",
                    WALLETS,
                    " (user_id, balance, version) VALUES ($1, 0, 1)
                     RETURNING user_id, balance, version, updated_at"
                ),
                &[&user_id],
            )
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    ErrorKind::UserAlreadyExists
                } else {
                    map_pg_err(e)
                }
            })?;
        Ok(Wallet {
            user_id: row.get(0),
            balance: row.get(1),
            version: row.get(2),
            updated_at: row.get(3),
        })
    }

    async fn get(&self, user_id: Uuid) -> Result<Wallet, ErrorKind> {
        let row = self
            .query_opt(
                const_format::concatcp!(
                    "SELECT user_id, balance, version, updated_at FROM ",
                    WALLETS,
                    " WHERE user_id = $1"
                ),
                &[&user_id],
            )
            .await
            .map_err(map_pg_err)?
            .ok_or_else(|| ErrorKind::NotFound("wallet".to_string()))?;
        Ok(Wallet {
            user_id: row.get(0),
            balance: row.get(1),
            version: row.get(2),
            updated_at: row.get(3),
        })
    }

    async fn compare_and_swap(
        &self,
        user_id: Uuid,
        expected_version: i64,
        new_balance: Decimal,
        tx: Transaction,
    ) -> Result<Wallet, ErrorKind> {
        // Single statement: the UPDATE and the journal INSERT share one
        // implicit Postgres transaction, so either both land or neither does.
        let row = self
            .query_opt(
                const_format::concatcp!(
                    "WITH updated AS (
                        UPDATE ", WALLETS, " SET balance = $2, version = version + 1, updated_at = now()
                        WHERE user_id = $1 AND version = $3
                        RETURNING user_id, balance, version, updated_at
                     ), inserted AS (
                        INSERT INTO ", TRANSACTIONS, "
                            (id, wallet_user_id, amount, balance_after, reference_type, reference_id, created_at)
                        SELECT $4, user_id, $5, balance, $6, $7, now() FROM updated
                     )
                     SELECT user_id, balance, version, updated_at FROM updated"
                ),
                &[
                    &user_id,
                    &new_balance,
                    &expected_version,
                    &tx.id,
                    &tx.amount,
                    &reference_type_to_str(tx.reference_type),
                    &tx.reference_id,
                ],
            )
            .await
            .map_err(map_pg_err)?;
        match row {
            Some(row) => Ok(Wallet {
                user_id: row.get(0),
                balance: row.get(1),
                version: row.get(2),
                updated_at: row.get(3),
            }),
            None => Err(ErrorKind::OptimisticLock),
        }
    }

    async fn transactions(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ErrorKind> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT id, wallet_user_id, amount, balance_after, reference_type, reference_id, created_at FROM ",
                    TRANSACTIONS,
                    " WHERE wallet_user_id = $1 ORDER BY created_at ASC LIMIT $2 OFFSET $3"
                ),
                &[&user_id, &(limit as i64), &(offset as i64)],
            )
            .await
            .map_err(map_pg_err)?;
        Ok(rows
            .into_iter()
            .map(|row| Transaction {
                id: row.get(0),
                wallet_user_id: row.get(1),
                amount: row.get(2),
                balance_after: row.get(3),
                reference_type: reference_type_from_str(row.get(4)),
                reference_id: row.get(5),
                created_at: row.get(6),
            })
            .collect())
    }
}
