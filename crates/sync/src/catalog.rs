//! Upstream catalog wire types.
//!
//! Pages look like `{ "info": { "next": <url|null>, ... }, "results": [...] }`.
//! Records are decoded leniently (missing or `null` strings become empty)
//! so the eligibility filter can run before any validation; only records
//! that pass the filter are validated for writing.

use serde::{Deserialize, Deserializer};

use multiverse_core::eligibility;
use multiverse_core::timestamp::parse_upstream_timestamp;
use multiverse_db::models::character::UpsertCharacter;

use crate::error::SyncError;

/// Server-side filters sent with the first request to shrink the payload.
pub const SEED_QUERY: &[(&str, &str)] = &[("species", "Human"), ("status", "Alive")];

/// Build the first page URL: `base` plus [`SEED_QUERY`].
pub fn seed_url(base: &str) -> Result<String, SyncError> {
    reqwest::Url::parse_with_params(base, SEED_QUERY)
        .map(String::from)
        .map_err(|e| SyncError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
}

/// One page of catalog results.
#[derive(Debug, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub info: Option<PageInfo>,
    /// Kept as raw JSON; each record is decoded on its own.
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub next: Option<String>,
}

impl CatalogPage {
    /// Interpret a fetched JSON body as a page.
    pub fn from_json(body: serde_json::Value) -> Result<Self, SyncError> {
        serde_json::from_value(body).map_err(|e| SyncError::Decode(format!("page envelope: {e}")))
    }

    /// Cursor for the following page. Empty strings count as "no more pages".
    pub fn next_cursor(&self) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|info| info.next.as_deref())
            .filter(|next| !next.is_empty())
    }

    pub fn into_results(self) -> Vec<serde_json::Value> {
        self.results.unwrap_or_default()
    }
}

/// `{ "name": ..., "url": ... }` reference to a location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRef {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

/// A character as served by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCharacter {
    /// Left untyped until validation so a bad id cannot hide the filter verdict.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub species: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_empty")]
    pub character_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(default)]
    pub origin: Option<LocationRef>,
    #[serde(default)]
    pub location: Option<LocationRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub created: Option<String>,
}

impl CatalogCharacter {
    /// Decode one entry of a page's `results` array.
    pub fn from_json(raw: serde_json::Value) -> Result<Self, SyncError> {
        serde_json::from_value(raw).map_err(|e| SyncError::Validation(format!("undecodable record: {e}")))
    }

    pub fn origin_name(&self) -> &str {
        self.origin.as_ref().map_or("", |o| o.name.as_str())
    }

    /// Apply the local eligibility rule to this record.
    pub fn is_eligible(&self) -> bool {
        eligibility::is_eligible(&self.species, &self.status, self.origin_name())
    }

    /// Validate required fields and build the full-replace write payload.
    ///
    /// Requires an integer `id`, a non-empty `url` and a parseable `created`.
    pub fn into_upsert(self) -> Result<UpsertCharacter, SyncError> {
        let id = self
            .id
            .as_ref()
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                SyncError::Validation(format!("record has no integer id (got {:?})", self.id))
            })?;

        if self.url.trim().is_empty() {
            return Err(SyncError::Validation(format!("character {id} has no url")));
        }

        let created = match self.created.as_deref() {
            Some(raw) => parse_upstream_timestamp(raw)
                .map_err(|e| SyncError::Validation(format!("character {id}: {e}")))?,
            None => {
                return Err(SyncError::Validation(format!(
                    "character {id} has no created timestamp"
                )))
            }
        };

        let origin = self.origin.unwrap_or_default();
        let location = self.location.unwrap_or_default();

        Ok(UpsertCharacter {
            id,
            name: self.name,
            status: self.status,
            species: self.species,
            character_type: self.character_type,
            gender: self.gender,
            origin_name: origin.name,
            origin_url: origin.url,
            location_name: location.name,
            location_url: location.url,
            image: self.image,
            url: self.url,
            created,
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
