/// Segue Queue Manager - queues follow-up songs while users listen
use clap::{Parser, Subcommand};
use segue_queue_manager::{build_scheduler, QueueManagerConfig};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "segue-queue-manager")]
#[command(about = "Segue trigger to follow-up queue manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reconciliation loop until Ctrl-C
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print a fresh base64 encryption key
    GenerateKey,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segue_queue_manager=info,segue_reconciler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            run(config).await?;
        }
        Commands::GenerateKey => {
            println!("{}", segue_vault::generate_key());
        }
    }

    Ok(())
}

async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = QueueManagerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Segue queue manager");
    tracing::info!("Store: {}", config.store.base_url);
    tracing::info!("Playback API: {}", config.playback.api_url);

    let mut scheduler = build_scheduler(&config)?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    shutdown.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
            }
        }
    });

    scheduler.run(shutdown).await;

    tracing::info!("Queue manager stopped");
    Ok(())
}
