//! Domain rules shared by the sync pipeline and the read API.
//!
//! Everything here is pure: no I/O, no async, no database types.

pub mod eligibility;
pub mod error;
pub mod listing;
pub mod timestamp;
pub mod types;
