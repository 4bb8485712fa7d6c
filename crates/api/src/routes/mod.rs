pub mod characters;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /characters/        list eligible characters (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(characters::router())
}
