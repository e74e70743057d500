//! Row decoding helpers shared by the repositories

use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::{Error, Result};

/// Decode a TEXT id column into its typed id
pub(crate) fn get_id<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
}

/// Decode a TEXT column holding one of a closed set of values
pub(crate) fn get_enum<T>(
    row: &SqliteRow,
    column: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T> {
    let raw: String = row.try_get(column)?;
    parse(&raw).ok_or_else(|| {
        Error::Other(format!("Unexpected value '{}' in column '{}'", raw, column))
    })
}
