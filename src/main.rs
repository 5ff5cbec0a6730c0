//! hosting server binary: wires config, the database connection (or an
//! in-memory fallback when Postgres is unreachable), the ledger, auth,
//! persistence ports, and the hub manager behind the HTTP routes.

use std::sync::Arc;

use pokerhouse::auth::{AuthService, InMemoryUserStore, UserRepository};
use pokerhouse::broadcaster::ChannelBroadcaster;
use pokerhouse::config::Config;
use pokerhouse::hosting::{AppState, Server};
use pokerhouse::ledger::{InMemoryWalletStore, Ledger};
use pokerhouse::persistence::{InMemoryStore, RouletteRepository, TableRepository};
use tokio_postgres::Client;

type Ports = (Arc<Ledger>, Arc<dyn UserRepository>, Arc<dyn TableRepository>, Arc<dyn RouletteRepository>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pokerhouse::log();

    let config = Config::from_env().unwrap_or_else(|err| {
        eprintln!("configuration error: {err}");
        std::process::exit(1);
    });

    let (ledger, users, tables, roulette_repository): Ports = match db(&config.database_url).await {
        Some(client) => (
            Arc::new(Ledger::new(Arc::new(client.clone()) as Arc<dyn pokerhouse::ledger::WalletStore>)),
            Arc::new(client.clone()) as Arc<dyn UserRepository>,
            Arc::new(client.clone()) as Arc<dyn TableRepository>,
            Arc::new(client) as Arc<dyn RouletteRepository>,
        ),
        None => {
            log::warn!("Postgres unreachable at startup; falling back to in-memory ports for this run");
            (
                Arc::new(Ledger::new(Arc::new(InMemoryWalletStore::new()))),
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryStore::new()),
                Arc::new(InMemoryStore::new()),
            )
        }
    };

    let auth = Arc::new(AuthService::new(users, Arc::clone(&ledger), &config.jwt_secret));
    let broadcaster = Arc::new(ChannelBroadcaster::new());

    let state = AppState::new(auth, ledger, tables, broadcaster, roulette_repository, config.server_port);

    pokerhouse::brb(Arc::clone(&state.hubs));

    Server::run(state).await?;
    Ok(())
}

/// Connects to Postgres, spawning the driver task the way the teacher's
/// `db()` does. Returns `None` rather than panicking so a missing
/// database degrades to the in-memory ports instead of refusing to
/// start — the only fatal startup faults are the ones `Config::from_env`
/// already catches (spec §7: only unrecoverable infra faults at startup
/// are fatal, not a slow or absent database on a dev box).
async fn db(url: &str) -> Option<Arc<Client>> {
    log::info!("connecting to database");
    match tokio_postgres::connect(url, tokio_postgres::NoTls).await {
        Ok((client, connection)) => {
            tokio::spawn(connection);
            let schema = const_format::concatcp!(
                pokerhouse::ledger::postgres::DDL,
                pokerhouse::auth::postgres::DDL,
                pokerhouse::persistence::postgres::DDL,
            );
            if let Err(err) = client.batch_execute(schema).await {
                log::error!("schema migration failed: {err}");
                return None;
            }
            Some(Arc::new(client))
        }
        Err(err) => {
            log::error!("database connection failed: {err}");
            None
        }
    }
}
