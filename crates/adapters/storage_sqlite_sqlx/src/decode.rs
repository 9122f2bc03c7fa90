//! Column decoding helpers shared by the row wrappers.

use std::str::FromStr;

use plan_accion_domain::period::{Period, Quarter, Year};
use plan_accion_domain::score::Score;
use plan_accion_domain::time::{self, Timestamp};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Parse a text column through the type's [`FromStr`] impl.
pub(crate) fn parsed<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(decode_error)
}

pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    time::from_stored(&raw).map_err(decode_error)
}

pub(crate) fn quarter(row: &SqliteRow, column: &str) -> Result<Quarter, sqlx::Error> {
    Quarter::new(row.try_get(column)?).map_err(decode_error)
}

/// Reads the `trimestre` and `anio` columns.
pub(crate) fn period(row: &SqliteRow) -> Result<Period, sqlx::Error> {
    let year = Year::new(row.try_get("anio")?).map_err(decode_error)?;
    Ok(Period::new(quarter(row, "trimestre")?, year))
}

pub(crate) fn score(row: &SqliteRow, column: &str) -> Result<Option<Score>, sqlx::Error> {
    let raw: Option<f64> = row.try_get(column)?;
    raw.map(Score::new).transpose().map_err(decode_error)
}
