//! Catalog ingestion pipeline.
//!
//! Walks the upstream character catalog page by page, keeps the records
//! that pass [`multiverse_core::eligibility`], and upserts them into the
//! local store. The pieces, leaf first:
//!
//! - [`fetcher`]: one bounded GET per call, 429 handling.
//! - [`retry`]: time-budgeted exponential backoff around any fallible call.
//! - [`catalog`]: upstream wire types and record validation.
//! - [`store`]: the create-or-replace seam over `CharacterRepo`.
//! - [`walker`]: the page loop that ties them together.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod retry;
pub mod store;
pub mod walker;

pub use error::SyncError;
pub use walker::{RecordErrorPolicy, SyncRunner, SyncSummary};
