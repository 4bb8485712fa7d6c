//! Ordering and pagination rules for the character list endpoint.
//!
//! Lives in `core` so the repository layer and the API share one definition
//! of which columns may be sorted on.

use crate::error::CoreError;

/// Default number of characters per page.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum number of characters per page.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Fields clients may order by, in the order they are reported in errors.
pub const ORDERING_FIELDS: &[&str] = &["name", "id"];

/// A column the list endpoint may sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
}

impl SortField {
    /// Column name as used in SQL.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A parsed `ordering` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Ordering {
    /// Ascending by id.
    fn default() -> Self {
        Self {
            field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl Ordering {
    /// Parse an optional `ordering` value such as `name` or `-id`.
    ///
    /// `None` or an empty string yields the default ordering. A leading `-`
    /// selects descending order. Unknown fields are a validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiverse_core::listing::{Ordering, SortDirection, SortField};
    ///
    /// let o = Ordering::parse(Some("-name")).unwrap();
    /// assert_eq!(o.field, SortField::Name);
    /// assert_eq!(o.direction, SortDirection::Desc);
    /// assert!(Ordering::parse(Some("species")).is_err());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(raw) => raw,
        };

        let (direction, name) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, raw),
        };

        let field = match name {
            "id" => SortField::Id,
            "name" => SortField::Name,
            _ => {
                return Err(CoreError::Validation(format!(
                    "Invalid ordering field '{name}'. Allowed: {}",
                    ORDERING_FIELDS.join(", ")
                )))
            }
        };

        Ok(Self { field, direction })
    }

    /// `ORDER BY` body. Name ordering falls back to id so pages are stable.
    pub fn to_sql(self) -> String {
        let col = self.field.column();
        let dir = self.direction.keyword();
        match self.field {
            SortField::Id => format!("{col} {dir}"),
            SortField::Name => format!("{col} {dir}, id {dir}"),
        }
    }
}

/// Clamp a user-provided limit to `[1, MAX_PAGE_SIZE]`, defaulting to
/// [`DEFAULT_PAGE_SIZE`].
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_ordering_defaults_to_id_ascending() {
        assert_eq!(Ordering::parse(None).unwrap(), Ordering::default());
        assert_eq!(Ordering::parse(Some("")).unwrap(), Ordering::default());
    }

    #[test]
    fn plain_field_is_ascending() {
        let o = Ordering::parse(Some("name")).unwrap();
        assert_eq!(o.field, SortField::Name);
        assert_eq!(o.direction, SortDirection::Asc);
    }

    #[test]
    fn dash_prefix_is_descending() {
        let o = Ordering::parse(Some("-id")).unwrap();
        assert_eq!(o.field, SortField::Id);
        assert_eq!(o.direction, SortDirection::Desc);
    }

    #[test]
    fn unknown_field_lists_allowed_fields() {
        let err = Ordering::parse(Some("-species")).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("name, id"));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        assert!(Ordering::parse(Some("Name")).is_err());
    }

    #[test]
    fn double_dash_is_rejected() {
        assert!(Ordering::parse(Some("--id")).is_err());
    }

    #[test]
    fn name_ordering_has_id_tiebreak() {
        let o = Ordering::parse(Some("-name")).unwrap();
        assert_eq!(o.to_sql(), "name DESC, id DESC");
        assert_eq!(Ordering::default().to_sql(), "id ASC");
    }

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(20)), 20);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(Some(7)), 7);
    }
}
