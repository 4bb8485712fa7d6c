//! Handlers for the `/characters` resource.
//!
//! Only characters that are Human, Alive and from an `Earth (...)` origin
//! are ever listed, regardless of what else the sync has stored.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use multiverse_core::listing::{clamp_limit, clamp_offset, Ordering};
use multiverse_db::models::character::Character;
use multiverse_db::repositories::CharacterRepo;

use crate::error::AppResult;
use crate::query::ListCharactersParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/characters/
///
/// Rejects an unknown `ordering` field or a non-numeric `limit`/`offset`
/// with 400 before touching the database.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListCharactersParams>, QueryRejection>,
) -> AppResult<Json<Page<Character>>> {
    let Query(params) = query?;
    let ordering = Ordering::parse(params.ordering.as_deref())?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let count = CharacterRepo::count_eligible(&state.pool).await?;
    let results = CharacterRepo::list_eligible(&state.pool, ordering, limit, offset).await?;

    Ok(Json(Page {
        count,
        limit,
        offset,
        results,
    }))
}
