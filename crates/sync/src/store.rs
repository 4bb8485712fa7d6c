//! Create-or-replace persistence seam used by the walker.

use async_trait::async_trait;

use multiverse_db::models::character::UpsertCharacter;
use multiverse_db::repositories::CharacterRepo;
use multiverse_db::DbPool;

use crate::error::SyncError;

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Idempotent write keyed by the upstream character id.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Insert `character`, or fully replace the row with the same id.
    async fn upsert(&self, character: &UpsertCharacter) -> Result<UpsertOutcome, SyncError>;
}

/// [`CharacterStore`] writing to PostgreSQL through [`CharacterRepo`].
pub struct PgCharacterStore {
    pool: DbPool,
}

impl PgCharacterStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterStore for PgCharacterStore {
    async fn upsert(&self, character: &UpsertCharacter) -> Result<UpsertOutcome, SyncError> {
        let row = CharacterRepo::upsert(&self.pool, character).await?;
        Ok(if row.inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }
}
