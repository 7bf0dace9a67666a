mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use campus_api::{AppContext, AppState};
use campus_db::{Database, KvBackend, MemoryBackend, Store};
use campus_seed::{HttpSeedSource, Seeder};

use crate::config::{Config, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus=debug,campus_api=debug,campus_db=info,campus_seed=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Storage
    let backend: Arc<dyn KvBackend> = match config.store {
        StoreBackend::Sqlite => Arc::new(Database::open(&config.db_path)?),
        StoreBackend::Memory => {
            warn!("Using in-memory store, nothing will survive a restart");
            Arc::new(MemoryBackend::new())
        }
    };

    // Shared state
    let seeder = Seeder::new(Arc::new(HttpSeedSource::new(&config.seed_url, config.seed_limit)));
    let app_state: AppState = Arc::new(AppContext::new(
        Store::new(backend),
        seeder,
        config.seed_password.clone(),
    )?);

    // Login needs users in place before the first attempt
    app_state.ensure_users().await?;

    // Routes
    let app = campus_api::router(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Campus portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
