//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Pagination and sort parameters (`?limit=&offset=&sort=`).
///
/// Values are clamped via `clamp_limit` / `clamp_offset`; `sort` is a
/// column name with an optional `-` prefix for descending order (e.g.
/// `-createdAt`). Unknown sort columns fall back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
}
