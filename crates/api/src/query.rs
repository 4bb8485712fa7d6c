//! Query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /api/characters/`.
///
/// Values are clamped and validated in the handler via
/// `multiverse_core::listing`.
#[derive(Debug, Default, Deserialize)]
pub struct ListCharactersParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// `name`, `id`, or either prefixed with `-` for descending order.
    pub ordering: Option<String>,
}
