use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use seniorcare_alarms::{AlarmEngine, LogSink, SystemClock, config::AlarmConfig};
use seniorcare_store::open_store;
use tracing_subscriber::FmtSubscriber;

/// Manage the alarms stored on this device
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Overrides SENIORCARE_DATA_DIR
    #[arg(short, long)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every alarm
    List,
    /// Add an alarm firing daily at TIME (HH:MM)
    Add { time: String, title: Vec<String> },
    /// Delete an alarm
    Remove { id: String },
    /// Switch an alarm on or off
    Toggle { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let args = Args::parse();
    let mut config = AlarmConfig::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir.into();
    }

    // Logs go to stderr so listings stay clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = open_store(&config.data_dir).await?;
    let engine = AlarmEngine::new(
        Arc::new(store),
        Arc::new(LogSink::new(config.notification_permission)),
        Arc::new(SystemClock),
    );
    engine.load().await;

    // Mutations only log write failures; `save` reports them

    match args.command {
        Command::List => {
            for alarm in engine.alarms().await {
                let state = if alarm.is_active { "on" } else { "off" };
                println!("{}  {}  {:<3}  {}", alarm.id, alarm.time, state, alarm.title);
            }
        }
        Command::Add { time, title } => {
            let alarm = engine.add(&title.join(" "), &time).await?;
            engine.save().await?;
            println!("Added {} at {}", alarm.id, alarm.time);
        }
        Command::Remove { id } => {
            if !engine.remove(&id).await {
                return Err(eyre!("No alarm with id {}", id));
            }
            engine.save().await?;
            println!("Removed {}", id);
        }
        Command::Toggle { id } => {
            let active = engine
                .toggle(&id)
                .await
                .ok_or_else(|| eyre!("No alarm with id {}", id))?;
            engine.save().await?;
            println!("{} is now {}", id, if active { "on" } else { "off" });
        }
    }

    Ok(())
}
