use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Error as RusqliteError;

pub mod categories_db_operations;
pub mod comments_db_operations;
pub mod languages_db_operations;
pub mod posts_db_operations;

/// Timestamps are stored as unix seconds; turns column `idx` back into UTC.
pub(crate) fn timestamp_to_utc(idx: usize, secs: i64) -> Result<DateTime<Utc>, RusqliteError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        RusqliteError::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {} is out of range", secs).into(),
        )
    })
}
