use std::sync::Arc;

use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::scoring_client::ScoringGateway;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store. Default: PgStore.
    pub store: Arc<dyn Store>,
    /// Recommendation scoring boundary. Default: MlScoringClient.
    pub scorer: Arc<dyn ScoringGateway>,
    pub tokens: TokenKeys,
    pub config: Config,
}
