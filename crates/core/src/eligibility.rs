//! The local business rule deciding which catalog characters are kept.
//!
//! Upstream query-string filters already narrow the fetched set to humans
//! that are alive, but origin variants cannot be filtered upstream. This
//! predicate is applied to every fetched record regardless, so a change in
//! upstream filtering can never widen what gets stored.

/// Required species, compared against the lower-cased record value.
pub const SPECIES_HUMAN: &str = "human";

/// Required status, compared against the lower-cased record value.
pub const STATUS_ALIVE: &str = "alive";

/// Literal origin prefix. Matched case-sensitively, so a bare `"Earth"`
/// origin never qualifies, only parenthetical variants such as
/// `"Earth (C-137)"`.
pub const ORIGIN_PREFIX: &str = "Earth (";

/// Returns `true` when a record with these field values may be persisted.
///
/// # Examples
///
/// ```
/// use multiverse_core::eligibility::is_eligible;
///
/// assert!(is_eligible("Human", "Alive", "Earth (C-137)"));
/// assert!(!is_eligible("Human", "Alive", "Earth"));
/// assert!(!is_eligible("Alien", "Alive", "Earth (C-137)"));
/// ```
pub fn is_eligible(species: &str, status: &str, origin_name: &str) -> bool {
    species.to_lowercase() == SPECIES_HUMAN
        && status.to_lowercase() == STATUS_ALIVE
        && origin_name.starts_with(ORIGIN_PREFIX)
}
