//! Registry of live table hubs. Creation is serialized so two concurrent
//! join requests for an unseen table can't spawn two competing actors;
//! lookups afterwards only need a read lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::broadcaster::Broadcaster;
use crate::error::ErrorKind;
use crate::ledger::Ledger;

use super::event::{Event, Reply};
use super::hub::{Outbox, TableHub};
use super::state::TableConfig;

pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(10);

struct HubHandle {
    tx: Outbox,
    cancel: CancellationToken,
}

pub struct HubManager {
    hubs: RwLock<HashMap<Uuid, HubHandle>>,
    ledger: Arc<Ledger>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl HubManager {
    pub fn new(ledger: Arc<Ledger>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        HubManager {
            hubs: RwLock::new(HashMap::new()),
            ledger,
            broadcaster,
        }
    }

    /// Look up a running hub, or spawn one under the write lock if none
    /// exists yet for this table.
    pub async fn get_or_create(&self, config: TableConfig) -> Outbox {
        let table_id = config.id;
        if let Some(handle) = self.hubs.read().await.get(&table_id) {
            return handle.tx.clone();
        }
        let mut hubs = self.hubs.write().await;
        if let Some(handle) = hubs.get(&table_id) {
            return handle.tx.clone();
        }
        let hub = TableHub::new(config, Arc::clone(&self.ledger), Arc::clone(&self.broadcaster));
        let (tx, cancel) = hub.spawn();
        hubs.insert(table_id, HubHandle { tx: tx.clone(), cancel });
        tx
    }

    pub async fn dispatch(&self, table_id: Uuid, event: Event) -> Reply {
        let tx = self
            .hubs
            .read()
            .await
            .get(&table_id)
            .map(|h| h.tx.clone())
            .ok_or(ErrorKind::HubClosed)?;
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        tx.send((event, reply_tx)).map_err(|_| ErrorKind::HubClosed)?;
        reply_rx.await.map_err(|_| ErrorKind::HubClosed)?
    }

    /// Cancel a single hub and drop its registry entry. The hub's own run
    /// loop performs the discard-in-flight-hand shutdown sequence.
    pub async fn remove(&self, table_id: Uuid) {
        if let Some(handle) = self.hubs.write().await.remove(&table_id) {
            handle.cancel.cancel();
        }
    }

    /// Signal every hub to shut down and wait up to [`SHUTDOWN_DEADLINE`]
    /// for them to finish discarding in-flight hands.
    pub async fn shutdown_all(&self) {
        let mut hubs = self.hubs.write().await;
        for (_, handle) in hubs.drain() {
            handle.cancel.cancel();
        }
        drop(hubs);
        tokio::time::sleep(SHUTDOWN_DEADLINE).await;
    }

    pub async fn table_count(&self) -> usize {
        self.hubs.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcaster::ChannelBroadcaster;
    use crate::ledger::InMemoryWalletStore;
    use rust_decimal_macros::dec;

    fn manager() -> HubManager {
        let ledger = Arc::new(Ledger::new(Arc::new(InMemoryWalletStore::new())));
        let broadcaster: Arc<dyn Broadcaster> = Arc::new(ChannelBroadcaster::new());
        HubManager::new(ledger, broadcaster)
    }

    fn config() -> TableConfig {
        TableConfig {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            small_blind: dec!(1),
            big_blind: dec!(2),
            min_buy_in: dec!(40),
            max_buy_in: dec!(200),
            max_players: 6,
        }
    }

    #[tokio::test]
    async fn get_or_create_reuses_existing_hub() {
        let manager = manager();
        let cfg = config();
        let first = manager.get_or_create(cfg.clone()).await;
        let second = manager.get_or_create(cfg).await;
        assert_eq!(manager.table_count().await, 1);
        assert!(first.same_channel(&second));
    }

    #[tokio::test]
    async fn remove_cancels_the_hub() {
        let manager = manager();
        manager.get_or_create(config()).await;
        assert_eq!(manager.table_count().await, 1);
        let table_id = manager.hubs.read().await.keys().next().copied().unwrap();
        manager.remove(table_id).await;
        assert_eq!(manager.table_count().await, 0);
    }
}
