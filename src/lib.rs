pub mod auth;
pub mod betting;
pub mod broadcaster;
pub mod cards;
pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod gameroom;
pub mod hosting;
pub mod ledger;
pub mod persistence;
pub mod rng;
pub mod roulette;
pub mod sidepot;
pub mod stage;

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` and writes DEBUG level to file, INFO level to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{time}.log")).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register a Ctrl+C handler that cancels every table hub and gives the
/// shutdown sequence its deadline to discard in-flight hands before the
/// process exits.
pub fn brb(manager: std::sync::Arc<gameroom::HubManager>) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("install ctrl-c handler");
        println!();
        log::warn!("shutdown requested, draining table hubs");
        manager.shutdown_all().await;
        std::process::exit(0);
    });
}
