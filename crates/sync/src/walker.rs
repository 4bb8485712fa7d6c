//! The page loop: fetch, filter, upsert, follow `next`.

use std::fmt;

use crate::catalog::{CatalogCharacter, CatalogPage};
use crate::error::SyncError;
use crate::fetcher::CatalogFetcher;
use crate::retry::RetryPolicy;
use crate::store::{CharacterStore, UpsertOutcome};

/// What to do with an eligible record that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordErrorPolicy {
    /// Abort the whole run with the validation error.
    #[default]
    Abort,
    /// Log the record, count it as skipped, and carry on.
    Skip,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Pages fetched.
    pub pages: usize,
    /// Eligible records written.
    pub seen: usize,
    pub created: usize,
    pub updated: usize,
    /// Eligible records dropped under [`RecordErrorPolicy::Skip`].
    pub skipped: usize,
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Synced {} (created={}, updated={}) Human+Alive with Earth-origin entries",
            self.seen, self.created, self.updated
        )?;
        if self.skipped > 0 {
            write!(f, ", skipped {} invalid", self.skipped)?;
        }
        Ok(())
    }
}

/// Drives one sync run over a fetcher and a store.
///
/// Pages are processed strictly one after another. A failure that survives
/// the retry policy ends the run; records already written stay written.
pub struct SyncRunner<F, S> {
    fetcher: F,
    store: S,
    retry: RetryPolicy,
    on_invalid: RecordErrorPolicy,
}

impl<F, S> SyncRunner<F, S>
where
    F: CatalogFetcher,
    S: CharacterStore,
{
    pub fn new(fetcher: F, store: S, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            store,
            retry,
            on_invalid: RecordErrorPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_record_policy(mut self, policy: RecordErrorPolicy) -> Self {
        self.on_invalid = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Walk every page starting at `seed_url` and return the final counts.
    pub async fn sync_all(&self, seed_url: &str) -> Result<SyncSummary, SyncError> {
        let mut summary = SyncSummary::default();
        let mut cursor = Some(seed_url.to_string());

        while let Some(url) = cursor.take() {
            let body = self.retry.run(|| self.fetcher.fetch(&url)).await?;
            let page = CatalogPage::from_json(body)?;
            summary.pages += 1;

            cursor = page.next_cursor().map(str::to_string);
            let results = page.into_results();
            tracing::info!(
                page = summary.pages,
                records = results.len(),
                has_next = cursor.is_some(),
                "Fetched catalog page",
            );

            for raw in results {
                self.process_record(raw, &mut summary).await?;
            }
        }

        tracing::info!(
            pages = summary.pages,
            seen = summary.seen,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "Catalog sync complete",
        );
        Ok(summary)
    }

    async fn process_record(
        &self,
        raw: serde_json::Value,
        summary: &mut SyncSummary,
    ) -> Result<(), SyncError> {
        let record = match CatalogCharacter::from_json(raw) {
            Ok(record) => record,
            Err(err) => return self.reject(err, summary),
        };

        if !record.is_eligible() {
            tracing::debug!(id = ?record.id, origin = record.origin_name(), "Record not eligible");
            return Ok(());
        }

        let character = match record.into_upsert() {
            Ok(character) => character,
            Err(err) => return self.reject(err, summary),
        };

        match self.store.upsert(&character).await? {
            UpsertOutcome::Created => summary.created += 1,
            UpsertOutcome::Updated => summary.updated += 1,
        }
        summary.seen += 1;
        Ok(())
    }

    fn reject(&self, err: SyncError, summary: &mut SyncSummary) -> Result<(), SyncError> {
        match self.on_invalid {
            RecordErrorPolicy::Abort => Err(err),
            RecordErrorPolicy::Skip => {
                tracing::warn!(error = %err, "Skipping invalid record");
                summary.skipped += 1;
                Ok(())
            }
        }
    }
}
