mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod internships;
mod models;
mod routes;
mod scoring_client;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::scoring_client::MlScoringClient;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Margdarshak API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL; an unreachable database aborts startup
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize scoring client
    let scorer = MlScoringClient::new(&config.ml_service_url);
    info!("Scoring client initialized (endpoint: {})", scorer.endpoint());

    let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_hours);

    // Build app state
    let state = AppState {
        store,
        scorer: Arc::new(scorer),
        tokens,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the SPA has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
