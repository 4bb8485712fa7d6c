use std::sync::Arc;

use crate::cache::Cache;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: multiverse_db::DbPool,
    /// Key/value cache probed by the health endpoint.
    pub cache: Arc<dyn Cache>,
}
