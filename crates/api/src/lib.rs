//! Multiverse read API library.
//!
//! Exposes the building blocks (config, state, cache, error handling,
//! routes) so integration tests and the binary entrypoint share them.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
