//! Repository for the `characters` table.

use sqlx::PgPool;
use multiverse_core::eligibility::{ORIGIN_PREFIX, SPECIES_HUMAN, STATUS_ALIVE};
use multiverse_core::listing::Ordering;
use multiverse_core::types::DbId;

use crate::models::character::{Character, UpsertCharacter, UpsertedCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, status, species, \"type\", gender, origin_name, origin_url, \
     location_name, location_url, image, url, created";

/// Read-side eligibility filter. Mirrors `eligibility::is_eligible` but
/// matches the origin prefix case-insensitively. Binds `$1..$3`.
const ELIGIBLE_WHERE: &str =
    "LOWER(species) = $1 AND LOWER(status) = $2 AND origin_name ILIKE $3";

/// Provides the sync upsert and the filtered read queries for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a character or fully replace the existing row with the same id.
    ///
    /// Runs as a single `INSERT ... ON CONFLICT` statement so concurrent
    /// readers observe either the old or the new row. `inserted` is derived
    /// from `xmax = 0`, which only holds for freshly inserted tuples.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertCharacter,
    ) -> Result<UpsertedCharacter, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (id, name, status, species, \"type\", gender, \
                 origin_name, origin_url, location_name, location_url, image, url, created) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 status = EXCLUDED.status, \
                 species = EXCLUDED.species, \
                 \"type\" = EXCLUDED.\"type\", \
                 gender = EXCLUDED.gender, \
                 origin_name = EXCLUDED.origin_name, \
                 origin_url = EXCLUDED.origin_url, \
                 location_name = EXCLUDED.location_name, \
                 location_url = EXCLUDED.location_url, \
                 image = EXCLUDED.image, \
                 url = EXCLUDED.url, \
                 created = EXCLUDED.created \
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        sqlx::query_as::<_, UpsertedCharacter>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(&input.species)
            .bind(&input.character_type)
            .bind(&input.gender)
            .bind(&input.origin_name)
            .bind(&input.origin_url)
            .bind(&input.location_name)
            .bind(&input.location_url)
            .bind(&input.image)
            .bind(&input.url)
            .bind(input.created)
            .fetch_one(pool)
            .await
    }

    /// Find a character by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List eligible characters in the requested order, one page at a time.
    pub async fn list_eligible(
        pool: &PgPool,
        ordering: Ordering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters \
             WHERE {ELIGIBLE_WHERE} \
             ORDER BY {} \
             LIMIT $4 OFFSET $5",
            ordering.to_sql()
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(SPECIES_HUMAN)
            .bind(STATUS_ALIVE)
            .bind(origin_pattern())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all eligible characters (ignores pagination).
    pub async fn count_eligible(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM characters WHERE {ELIGIBLE_WHERE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(SPECIES_HUMAN)
            .bind(STATUS_ALIVE)
            .bind(origin_pattern())
            .fetch_one(pool)
            .await
    }
}

/// `ILIKE` pattern for the origin prefix.
fn origin_pattern() -> String {
    format!("{ORIGIN_PREFIX}%")
}
