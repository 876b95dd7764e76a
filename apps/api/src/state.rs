use sqlx::PgPool;

use crate::auth::client::UsersServiceClient;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub users: UsersServiceClient,
    /// Kept for handlers that need deploy-specific knobs (none today).
    #[allow(dead_code)]
    pub config: Config,
}
