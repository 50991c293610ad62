//! Model metadata for RETURNING statements.

use crate::error::Result;
use crate::param::Param;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql};

/// Table metadata and per-instance column access for a mapped struct.
///
/// Typically derived with `#[derive(Model)]`:
///
/// ```ignore
/// use pg_returning::{FromRow, Model};
///
/// #[derive(FromRow, Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     id: i64,
///     name: String,
///     visits: i32,
/// }
/// ```
///
/// `COLUMNS` lists the concrete columns of the table in declaration order;
/// relation traversals are not modeled. The primary key column must appear
/// in `COLUMNS`.
pub trait Model: Send + Sync {
    /// Table name.
    const TABLE: &'static str;

    /// Concrete columns, in declaration order. Includes the primary key.
    const COLUMNS: &'static [&'static str];

    /// Primary key column name.
    const PRIMARY_KEY: &'static str;

    /// Rust type of the primary key column.
    type Pk: for<'a> FromSql<'a> + ToSql + Send + Sync + Clone + 'static;

    /// Current primary key value of this instance.
    fn pk(&self) -> Self::Pk;

    /// Current value of the named column as a statement parameter, or
    /// `None` if the name is not a column of this model.
    fn value_of(&self, column: &str) -> Option<Param>;

    /// Copy every column present in `row` onto the matching fields of this
    /// instance. Columns of the row that do not belong to the model are
    /// ignored; model fields absent from the row keep their current value.
    fn apply_row(&mut self, row: &Row) -> Result<()>;
}
