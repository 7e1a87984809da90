//! Conversions between SQLite column values and domain values.

use std::fmt::Display;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, Row, Sqlite, Type};

use crate::infrastructure::ports::RepoError;
use charsheet_domain::{ClockTime, Duration};

/// Read a column, reporting type mismatches as database errors.
pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::database("decode_row", e))
}

/// Parse a stored id column.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, RepoError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(RepoError::serialization)
}

pub(crate) fn id_column<T>(row: &SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = column(row, name)?;
    parse_id(&raw)
}

pub(crate) fn optional_id_column<T>(row: &SqliteRow, name: &str) -> Result<Option<T>, RepoError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = column(row, name)?;
    raw.as_deref().map(parse_id).transpose()
}

/// Read a non-negative INTEGER column that must fit in `u32`.
pub(crate) fn u32_column(row: &SqliteRow, name: &str) -> Result<u32, RepoError> {
    let raw: i64 = column(row, name)?;
    u32::try_from(raw)
        .map_err(|_| RepoError::serialization(format!("{} out of range: {}", name, raw)))
}

pub(crate) fn u8_column(row: &SqliteRow, name: &str) -> Result<u8, RepoError> {
    let raw: i64 = column(row, name)?;
    u8::try_from(raw)
        .map_err(|_| RepoError::serialization(format!("{} out of range: {}", name, raw)))
}

pub(crate) fn i32_column(row: &SqliteRow, name: &str) -> Result<i32, RepoError> {
    let raw: i64 = column(row, name)?;
    i32::try_from(raw)
        .map_err(|_| RepoError::serialization(format!("{} out of range: {}", name, raw)))
}

/// Durations are stored as `HH:MM:SS` text.
pub(crate) fn duration_to_text(duration: Duration) -> String {
    duration.to_clock_time().to_string()
}

/// Parse stored `HH:MM:SS` text back into rounds.
///
/// Text that is not a whole number of rounds is rejected rather than rounded.
pub(crate) fn duration_from_text(text: &str) -> Result<Duration, RepoError> {
    let clock: ClockTime = text.parse().map_err(RepoError::serialization)?;
    Duration::try_from(clock).map_err(RepoError::serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_domain::ClassId;

    #[test]
    fn duration_text_round_trip() {
        let duration = Duration::from_rounds(601);
        let text = duration_to_text(duration);
        assert_eq!(text, "01:00:06");
        assert_eq!(duration_from_text(&text).unwrap(), duration);
    }

    #[test]
    fn partial_round_text_is_a_serialization_error() {
        let err = duration_from_text("00:00:07").unwrap_err();
        assert!(matches!(err, RepoError::Serialization(_)));
        assert!(duration_from_text("one minute").is_err());
    }

    #[test]
    fn bad_ids_are_serialization_errors() {
        let err = parse_id::<ClassId>("not-a-uuid").unwrap_err();
        assert!(matches!(err, RepoError::Serialization(_)));
    }
}
