//! The wallet service: the sole authority on player balances. Every
//! mutation is optimistic-concurrency-controlled and journals an
//! immutable transaction in the same atomic scope as the balance update.

pub mod postgres;
pub mod store;

pub use store::{InMemoryWalletStore, WalletStore};

use crate::domain::{ReferenceType, Transaction, Wallet};
use crate::error::ErrorKind;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

const MAX_RETRIES: u32 = 3;

pub struct Ledger {
    store: Arc<dyn WalletStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Ledger { store }
    }

    pub async fn create_wallet(&self, user_id: Uuid) -> Result<Wallet, ErrorKind> {
        self.store.create(user_id).await
    }

    pub async fn balance(&self, user_id: Uuid) -> Result<Wallet, ErrorKind> {
        self.store.get(user_id).await
    }

    pub async fn deposit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        ref_type: ReferenceType,
        ref_id: Option<Uuid>,
    ) -> Result<Wallet, ErrorKind> {
        if amount <= Decimal::ZERO {
            return Err(ErrorKind::InvalidInput("amount must be positive".to_string()));
        }
        self.mutate(user_id, amount, ref_type, ref_id).await
    }

    pub async fn withdraw(
        &self,
        user_id: Uuid,
        amount: Decimal,
        ref_type: ReferenceType,
        ref_id: Option<Uuid>,
    ) -> Result<Wallet, ErrorKind> {
        if amount <= Decimal::ZERO {
            return Err(ErrorKind::InvalidInput("amount must be positive".to_string()));
        }
        self.mutate(user_id, -amount, ref_type, ref_id).await
    }

    pub async fn transactions(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ErrorKind> {
        self.store.transactions(user_id, limit, offset).await
    }

    /// Read-compute-commit with a pre-check against the signed `delta`,
    /// retried up to `MAX_RETRIES` times on an optimistic-lock conflict.
    async fn mutate(
        &self,
        user_id: Uuid,
        delta: Decimal,
        ref_type: ReferenceType,
        ref_id: Option<Uuid>,
    ) -> Result<Wallet, ErrorKind> {
        let mut last_err = ErrorKind::OptimisticLock;
        for _ in 0..MAX_RETRIES {
            let wallet = self.store.get(user_id).await?;
            let new_balance = wallet.balance + delta;
            if new_balance < Decimal::ZERO {
                return Err(ErrorKind::InsufficientFunds);
            }
            let transaction = Transaction {
                id: Uuid::now_v7(),
                wallet_user_id: user_id,
                amount: delta,
                balance_after: new_balance,
                reference_type: ref_type,
                reference_id: ref_id,
                created_at: Utc::now(),
            };
            match self
                .store
                .compare_and_swap(user_id, wallet.version, new_balance, transaction)
                .await
            {
                Ok(wallet) => return Ok(wallet),
                Err(ErrorKind::OptimisticLock) => {
                    last_err = ErrorKind::OptimisticLock;
                    continue;
                }
                Err(other) => return Err(other),
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc as StdArc;

    fn ledger() -> (Ledger, Uuid) {
        let store = StdArc::new(InMemoryWalletStore::new());
        let user_id = Uuid::new_v4();
        (Ledger::new(store), user_id)
    }

    #[tokio::test]
    async fn deposit_then_withdraw_preserves_balance() {
        let (ledger, user_id) = ledger();
        ledger.create_wallet(user_id).await.unwrap();
        ledger
            .deposit(user_id, dec!(100), ReferenceType::Deposit, None)
            .await
            .unwrap();
        let wallet = ledger
            .withdraw(user_id, dec!(40), ReferenceType::Withdrawal, None)
            .await
            .unwrap();
        assert_eq!(wallet.balance, dec!(60));
        let txs = ledger.transactions(user_id, 10, 0).await.unwrap();
        assert_eq!(txs.last().unwrap().balance_after, wallet.balance);
    }

    #[tokio::test]
    async fn withdraw_more_than_balance_fails() {
        let (ledger, user_id) = ledger();
        ledger.create_wallet(user_id).await.unwrap();
        ledger
            .deposit(user_id, dec!(10), ReferenceType::Deposit, None)
            .await
            .unwrap();
        let err = ledger
            .withdraw(user_id, dec!(20), ReferenceType::Withdrawal, None)
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::InsufficientFunds);
    }

    #[tokio::test]
    async fn concurrent_withdrawals_respect_balance() {
        let store = StdArc::new(InMemoryWalletStore::new());
        let user_id = Uuid::new_v4();
        let ledger = StdArc::new(Ledger::new(store));
        ledger.create_wallet(user_id).await.unwrap();
        ledger
            .deposit(user_id, dec!(450), ReferenceType::Deposit, None)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let ledger = StdArc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger
                    .withdraw(user_id, dec!(100), ReferenceType::Withdrawal, None)
                    .await
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 4);
        let wallet = ledger.balance(user_id).await.unwrap();
        assert_eq!(wallet.balance, dec!(50));
    }
}
