/// Segue Store - users, sealed tokens and song mappings over HTTP
use clap::{Parser, Subcommand};
use segue_store::{create_router, AppState, StoreConfig};
use segue_vault::AesGcmTokenCipher;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "segue-store")]
#[command(about = "Segue user, token and mapping store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List all users
    ListUsers {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segue_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::ListUsers { config } => {
            list_users(config).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = StoreConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Segue store");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = segue_storage::create_pool(&config.storage.database_url).await?;
    segue_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let cipher = AesGcmTokenCipher::from_base64_key(&config.vault.encryption_key)?;
    let app = create_router(AppState::new(pool, Arc::new(cipher)));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn list_users(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = StoreConfig::load(config_path.as_deref())?;
    let pool = segue_storage::create_pool(&config.storage.database_url).await?;
    segue_storage::run_migrations(&pool).await?;

    let users = segue_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        let mappings = segue_storage::mappings::get_by_user(&pool, &user.user_id).await?;
        println!("  {} - {} mappings", user.user_id, mappings.len());
    }

    Ok(())
}
