use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use seniorcare_alarms::{AlarmEngine, LogSink, SystemClock, config::AlarmConfig};
use seniorcare_store::{FallbackStore, MemoryStore, open_store};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = AlarmConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting SeniorCare alarm engine");

    // Keep alarms in memory if the data directory becomes unwritable
    let durable = open_store(&config.data_dir).await?;
    let store = FallbackStore::new(durable, MemoryStore::new());

    let engine = AlarmEngine::new(
        Arc::new(store),
        Arc::new(LogSink::new(config.notification_permission)),
        Arc::new(SystemClock),
    );
    let loaded = engine.load().await;
    info!("Loaded {} alarms from {}", loaded, config.data_dir.display());

    engine
        .run(config.check_interval, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await;

    Ok(())
}
