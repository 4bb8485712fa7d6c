/// Character primary keys mirror the upstream catalog id (PostgreSQL BIGINT).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
