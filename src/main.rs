use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::fmt::format::FmtSpan;

use points_leaderboard::{
    AppState, KeyValueStore, LeaderboardConfig, MemoryStore, PgKvStore, StoreBackend, create_app,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(LeaderboardConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        eprintln!("Please check environment variables.");
        e
    })?);

    init_logging(&config)?;

    info!("Starting points leaderboard server");

    let store = connect_store(&config).await?;
    let app = create_app(AppState::new(store, config.clone()));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e))?;

    info!("Leaderboard server listening on {}", bind_addr);
    info!(
        "Leaderboard: top_n={}, max_top_n={}, tie_policy={}, store_timeout={}ms",
        config.leaderboard.default_top_n,
        config.leaderboard.max_top_n,
        config.leaderboard.tie_policy,
        config.store.timeout_ms
    );
    if config.security.allows_any_origin() {
        warn!("ALLOWED_ORIGINS not set, CORS accepts requests from any origin");
    } else {
        info!("CORS origins: {}", config.security.allowed_origins.join(", "));
    }

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &LeaderboardConfig) -> Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(if config.logging.log_requests {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}

/// Open the configured key-value store
async fn connect_store(config: &LeaderboardConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .store
                .postgres_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;

            let store = PgKvStore::connect(url, config.store.max_connections, config.store.timeout())
                .await
                .context("Failed to open PostgreSQL store")?;
            store
                .init_schema()
                .await
                .context("Failed to initialize PostgreSQL schema")?;

            Ok(Arc::new(store))
        }
    }
}
