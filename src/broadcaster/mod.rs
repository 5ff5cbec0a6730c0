//! The broadcaster capability: the only thing the hub knows about
//! transport. `broadcast_to_table`/`send_to_player` must never block the
//! hub for longer than a short bounded interval — the reference
//! implementation isolates slow clients behind a bounded per-client
//! channel and drops the client on overflow rather than throttling
//! everyone else.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::dto::ServerMessage;

/// Per-client outbound buffer depth before the connection is dropped.
pub const OUTBOUND_BUFFER_DEPTH: usize = 64;

#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast_to_table(&self, table_id: Uuid, message: &ServerMessage);
    async fn send_to_player(&self, table_id: Uuid, user_id: Uuid, message: &ServerMessage);
}

/// One subscriber's outbound channel; `tx` is cloned into the hub-facing
/// broadcaster, `rx` is owned by whatever drives the actual socket write.
pub struct Subscriber {
    pub user_id: Uuid,
    pub tx: mpsc::Sender<String>,
}

#[derive(Default)]
struct TableSubscribers {
    subscribers: Vec<Subscriber>,
}

/// Reference broadcaster: an in-process registry of per-table
/// subscriber lists, each with its own bounded channel.
#[derive(Default)]
pub struct ChannelBroadcaster {
    tables: RwLock<HashMap<Uuid, TableSubscribers>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and return the receiving half of its
    /// bounded channel for the transport layer to drain.
    pub fn subscribe(&self, table_id: Uuid, user_id: Uuid) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER_DEPTH);
        self.tables
            .write()
            .expect("subscriber registry poisoned")
            .entry(table_id)
            .or_default()
            .subscribers
            .push(Subscriber { user_id, tx });
        rx
    }

    pub fn unsubscribe(&self, table_id: Uuid, user_id: Uuid) {
        if let Some(entry) = self.tables.write().expect("subscriber registry poisoned").get_mut(&table_id) {
            entry.subscribers.retain(|s| s.user_id != user_id);
        }
    }

    fn send(&self, table_id: Uuid, user_id: Option<Uuid>, payload: &str) {
        let mut dead = Vec::new();
        {
            let tables = self.tables.read().expect("subscriber registry poisoned");
            let Some(entry) = tables.get(&table_id) else {
                return;
            };
            for subscriber in &entry.subscribers {
                if user_id.is_some_and(|u| u != subscriber.user_id) {
                    continue;
                }
                match subscriber.tx.try_send(payload.to_string()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                        log::warn!(
                            "dropping slow/closed subscriber {} on table {}",
                            subscriber.user_id,
                            table_id
                        );
                        dead.push(subscriber.user_id);
                    }
                }
            }
        }
        if !dead.is_empty() {
            let mut tables = self.tables.write().expect("subscriber registry poisoned");
            if let Some(entry) = tables.get_mut(&table_id) {
                entry.subscribers.retain(|s| !dead.contains(&s.user_id));
            }
        }
    }
}

#[async_trait]
impl Broadcaster for ChannelBroadcaster {
    async fn broadcast_to_table(&self, table_id: Uuid, message: &ServerMessage) {
        let payload = serde_json::to_string(message).expect("ServerMessage always serializes");
        self.send(table_id, None, &payload);
    }

    async fn send_to_player(&self, table_id: Uuid, user_id: Uuid, message: &ServerMessage) {
        let payload = serde_json::to_string(message).expect("ServerMessage always serializes");
        self.send(table_id, Some(user_id), &payload);
    }
}

fn _assert_serialize<T: Serialize>() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ServerMessage;

    #[tokio::test]
    async fn overflowing_buffer_drops_the_client_not_the_broadcast() {
        let broadcaster = ChannelBroadcaster::new();
        let table_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let mut rx = broadcaster.subscribe(table_id, user_id);

        for _ in 0..OUTBOUND_BUFFER_DEPTH + 10 {
            broadcaster
                .broadcast_to_table(table_id, &ServerMessage::error("flood"))
                .await;
        }

        // the channel is bounded; draining still gets messages, and the
        // broadcast call itself never blocked or panicked.
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn send_to_player_only_reaches_that_player() {
        let broadcaster = ChannelBroadcaster::new();
        let table_id = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rx_a = broadcaster.subscribe(table_id, a);
        let mut rx_b = broadcaster.subscribe(table_id, b);

        broadcaster
            .send_to_player(table_id, a, &ServerMessage::error("only for a"))
            .await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }
}
