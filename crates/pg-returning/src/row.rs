//! Row mapping traits.

use crate::error::Result;
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// Typically derived with `#[derive(FromRow)]` from `pg-returning-derive`.
///
/// # Example
///
/// ```ignore
/// use pg_returning::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     username: String,
///     email: Option<String>,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self.
    fn from_row(row: &Row) -> Result<Self>;
}

/// Extension trait for typed column access with crate errors.
pub trait RowExt {
    /// Get a column value, returning [`Error::Decode`](crate::Error::Decode)
    /// on failure.
    fn try_get_column<T>(&self, column: &str) -> Result<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> Result<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| crate::error::Error::decode(column, e.to_string()))
    }
}
