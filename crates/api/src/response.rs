//! Response envelope types for API handlers.

use serde::Serialize;

/// Offset-paginated list envelope: `{ count, limit, offset, results }`.
///
/// `count` is the total number of matching rows, independent of the page.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
    pub results: Vec<T>,
}
