//! The persistence port the ledger depends on. One in-memory
//! implementation (used in tests and as a dev fallback) and one
//! Postgres-backed implementation (see `postgres.rs`).

use crate::domain::{Transaction, Wallet};
use crate::error::ErrorKind;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn create(&self, user_id: Uuid) -> Result<Wallet, ErrorKind>;
    async fn get(&self, user_id: Uuid) -> Result<Wallet, ErrorKind>;
    /// Commit iff the wallet's current `version` equals the one `get`
    /// returned when the caller computed `new_balance`; append `tx` in
    /// the same atomic scope.
    async fn compare_and_swap(
        &self,
        user_id: Uuid,
        expected_version: i64,
        new_balance: Decimal,
        tx: Transaction,
    ) -> Result<Wallet, ErrorKind>;
    async fn transactions(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ErrorKind>;
}

#[derive(Default)]
pub struct InMemoryWalletStore {
    wallets: RwLock<HashMap<Uuid, Wallet>>,
    journal: RwLock<HashMap<Uuid, Vec<Transaction>>>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn create(&self, user_id: Uuid) -> Result<Wallet, ErrorKind> {
        let mut wallets = self.wallets.write().expect("wallet lock poisoned");
        if wallets.contains_key(&user_id) {
            return Err(ErrorKind::UserAlreadyExists);
        }
        let wallet = Wallet {
            user_id,
            balance: Decimal::ZERO,
            version: 1,
            updated_at: Utc::now(),
        };
        wallets.insert(user_id, wallet.clone());
        Ok(wallet)
    }

    async fn get(&self, user_id: Uuid) -> Result<Wallet, ErrorKind> {
        self.wallets
            .read()
            .expect("wallet lock poisoned")
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ErrorKind::NotFound("wallet".to_string()))
    }

    async fn compare_and_swap(
        &self,
        user_id: Uuid,
        expected_version: i64,
        new_balance: Decimal,
        tx: Transaction,
    ) -> Result<Wallet, ErrorKind> {
        let mut wallets = self.wallets.write().expect("wallet lock poisoned");
        let wallet = wallets
            .get_mut(&user_id)
            .ok_or_else(|| ErrorKind::NotFound("wallet".to_string()))?;
        if wallet.version != expected_version {
            return Err(ErrorKind::OptimisticLock);
        }
        wallet.balance = new_balance;
        wallet.version += 1;
        wallet.updated_at = Utc::now();
        let result = wallet.clone();
        drop(wallets);
        self.journal
            .write()
            .expect("journal lock poisoned")
            .entry(user_id)
            .or_default()
            .push(tx);
        Ok(result)
    }

    async fn transactions(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ErrorKind> {
        let journal = self.journal.read().expect("journal lock poisoned");
        let entries = journal.get(&user_id).cloned().unwrap_or_default();
        Ok(entries.into_iter().skip(offset).take(limit).collect())
    }
}
