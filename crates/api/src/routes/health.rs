use axum::{routing::get, Router};

use crate::handlers::health;
use crate::state::AppState;

/// Mount the health probe at root level (NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(health::health_check))
}
