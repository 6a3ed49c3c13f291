use sqlx::PgPool;

use crate::enhance::AiEnhancer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Provider client plus backoff policy. Passed explicitly, never a global.
    pub ai: AiEnhancer,
}
