//! Shared application state handed to every route as `web::Data`, the
//! same role the teacher's `Casino` plays for its room registry — except
//! this façade fronts two independent games plus auth/wallet instead of
//! one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::broadcaster::ChannelBroadcaster;
use crate::domain::RouletteTable;
use crate::gameroom::HubManager;
use crate::ledger::Ledger;
use crate::persistence::{RouletteRepository, TableRepository};
use crate::roulette::RouletteTableRunner;

pub struct AppState {
    pub auth: Arc<AuthService>,
    pub ledger: Arc<Ledger>,
    pub hubs: Arc<HubManager>,
    pub tables: Arc<dyn TableRepository>,
    pub broadcaster: Arc<ChannelBroadcaster>,
    pub roulette_repository: Arc<dyn RouletteRepository>,
    pub server_port: u16,
    roulette_runners: RwLock<HashMap<Uuid, Arc<RouletteTableRunner>>>,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        ledger: Arc<Ledger>,
        tables: Arc<dyn TableRepository>,
        broadcaster: Arc<ChannelBroadcaster>,
        roulette_repository: Arc<dyn RouletteRepository>,
        server_port: u16,
    ) -> Self {
        let broadcast_port: Arc<dyn crate::broadcaster::Broadcaster> = Arc::clone(&broadcaster) as Arc<_>;
        AppState {
            hubs: Arc::new(HubManager::new(Arc::clone(&ledger), broadcast_port)),
            auth,
            ledger,
            tables,
            broadcaster,
            roulette_repository,
            server_port,
            roulette_runners: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a roulette table and spawns its commit/betting/settle
    /// loop in the background, returning the handle other routes dispatch
    /// bets against.
    pub async fn open_roulette_table(&self, table: RouletteTable, betting_window: Duration) -> Arc<RouletteTableRunner> {
        let runner = Arc::new(RouletteTableRunner::new(
            table.clone(),
            Arc::clone(&self.ledger),
            Arc::clone(&self.roulette_repository),
            betting_window,
        ));
        self.roulette_runners.write().await.insert(table.id, Arc::clone(&runner));
        tokio::spawn(Arc::clone(&runner).run());
        runner
    }

    pub async fn roulette_runner(&self, table_id: Uuid) -> Option<Arc<RouletteTableRunner>> {
        self.roulette_runners.read().await.get(&table_id).cloned()
    }

    pub async fn active_roulette_tables(&self) -> Vec<RouletteTable> {
        self.roulette_runners
            .read()
            .await
            .values()
            .map(|r| r.table.clone())
            .collect()
    }
}
