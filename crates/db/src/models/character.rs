//! Character entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use multiverse_core::types::{DbId, Timestamp};

/// A character row from the `characters` table.
///
/// `id` is the upstream catalog id, never generated locally.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub species: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub character_type: String,
    pub gender: String,
    pub origin_name: String,
    pub origin_url: String,
    pub location_name: String,
    pub location_url: String,
    pub image: String,
    pub url: String,
    pub created: Timestamp,
}

/// Full replacement payload for a character, written by the sync pipeline.
///
/// Every field is written on both insert and update; there is no partial
/// merge.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertCharacter {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub species: String,
    pub character_type: String,
    pub gender: String,
    pub origin_name: String,
    pub origin_url: String,
    pub location_name: String,
    pub location_url: String,
    pub image: String,
    pub url: String,
    pub created: Timestamp,
}

/// Row returned by an upsert: the stored character plus whether the
/// statement inserted it.
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedCharacter {
    #[sqlx(flatten)]
    pub character: Character,
    pub inserted: bool,
}
