//! Route definitions for the `/characters` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

/// Routes for the characters collection.
///
/// ```text
/// GET    /characters/    -> list
/// GET    /characters     -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/characters/", get(characters::list))
        .route("/characters", get(characters::list))
}
