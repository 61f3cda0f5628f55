//! iGaming Platform Server
//!
//! Wallet, session and compliance endpoints of a mock casino platform, with
//! every player action mirrored to the FT marketing integration.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, ConfigOverrides};
use igp_core::activity::ActivityLog;
use igp_core::entities::{MemoryUserStore, PgUserStore, UserStore};
use igp_core::processors::TelemetryWorker;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// iGaming platform simulator with FT integration
#[derive(Parser, Debug)]
#[command(name = "igp-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (optional)
    #[arg(short, long, default_value = "./igp-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Base URL of the FT integration API
    #[arg(long, env = "FT_API_URL")]
    ft_api_url: Option<String>,

    /// FT API key; without one, telemetry runs in mock mode
    #[arg(long, env = "FT_API_KEY", hide_env_values = true)]
    ft_api_key: Option<String>,

    /// Origin tag stamped on every FT event
    #[arg(long, env = "PLATFORM_ORIGIN")]
    platform_origin: Option<String>,

    /// Key trusted servers present in X-API-Key
    #[arg(long, env = "OPERATOR_API_KEY", hide_env_values = true)]
    operator_api_key: Option<String>,

    /// Platform-wide secret for widget tokens
    #[arg(long, env = "FT_JWT_SECRET", hide_env_values = true)]
    ft_jwt_secret: Option<String>,

    /// PostgreSQL URL; without one, users live in memory
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen: self.listen,
            ft_api_url: self.ft_api_url.clone(),
            ft_api_key: self.ft_api_key.clone(),
            platform_origin: self.platform_origin.clone(),
            operator_api_key: self.operator_api_key.clone(),
            ft_jwt_secret: self.ft_jwt_secret.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting igp-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.overrides()));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let activity = ActivityLog::new(loaded_config.server.activity_capacity);
    if loaded_config.telemetry.is_mock() {
        tracing::warn!("No FT API key configured, telemetry runs in mock mode");
    }
    if loaded_config.gateway.operator_key_hash.is_none() {
        tracing::warn!("No operator API key configured, only player sessions are accepted");
    }

    // Convert to shared config with separate locks for each section
    let shared_config = loaded_config.into_shared();

    let (store, db_pool) = open_store(&args).await?;

    // Create application state
    let (state, telemetry_rx) = AppState::new(store, shared_config, activity);

    // Telemetry worker drains the outbound queue until shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = TelemetryWorker::new(
        state.telemetry.dispatcher().clone(),
        telemetry_rx,
        shutdown_rx,
    );
    let worker_handle = tokio::spawn(worker.run());

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal background tasks to stop
    shutdown_notify.notify_one();
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        tracing::error!("Telemetry worker panicked: {}", e);
    }

    if let Some(pool) = db_pool {
        tracing::info!("Closing database connections...");
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the seeded in-memory store.
async fn open_store(args: &Args) -> anyhow::Result<(Arc<dyn UserStore>, Option<PgPool>)> {
    let Some(database_url) = args.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, using in-memory user store with the demo player");
        return Ok((Arc::new(MemoryUserStore::seeded()), None));
    };

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    Ok((Arc::new(PgUserStore::new(db_pool.clone())), Some(db_pool)))
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
