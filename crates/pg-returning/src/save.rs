//! Instance-level persistence with RETURNING refresh.
//!
//! Saving through these helpers writes the instance and refreshes it from
//! the row the database actually stored, so trigger- and default-computed
//! columns come back without a second query.

use crate::client::GenericClient;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::param::ParamList;
use crate::qb;
use crate::qb::ReturningStatement;
use crate::row::FromRow;

/// UPDATE/INSERT an instance and refresh it in place from RETURNING.
///
/// Blanket-implemented for every [`Model`].
pub trait SaveReturning: Model + Sized {
    /// UPDATE every non-key column of this instance's row and refresh the
    /// instance from the stored values.
    ///
    /// Returns `false` when no row matched the primary key (nothing was
    /// written and the instance is untouched).
    fn save_returning<'a>(
        &'a mut self,
        conn: &'a impl GenericClient,
    ) -> impl std::future::Future<Output = Result<bool>> + Send + 'a {
        let fields: Vec<&'static str> = Self::COLUMNS
            .iter()
            .filter(|c| **c != Self::PRIMARY_KEY)
            .copied()
            .collect();
        self.save_fields_returning(conn, fields)
    }

    /// UPDATE only the named columns of this instance's row and refresh
    /// those fields (plus the key) from the stored values.
    fn save_fields_returning<'a>(
        &'a mut self,
        conn: &'a impl GenericClient,
        fields: impl IntoIterator<Item = &'a str> + Send + 'a,
    ) -> impl std::future::Future<Output = Result<bool>> + Send + 'a {
        async move {
            let fields: Vec<&str> = fields.into_iter().collect();
            if fields.is_empty() {
                return Err(Error::validation("save requires at least one field"));
            }
            let mut stmt = qb::update::<Self>();
            for field in &fields {
                let param = self.value_of(field).ok_or_else(|| {
                    Error::validation(format!(
                        "unknown field '{}' for table {}",
                        field,
                        Self::TABLE
                    ))
                })?;
                stmt = stmt.set_param(*field, param);
            }
            let result = stmt.only(&fields).by_pk(self.pk()).execute(conn).await?;
            match result.first() {
                Some(record) => {
                    self.apply_row(record.row())?;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// INSERT this instance and refresh it in place, picking up the
    /// database-generated primary key and any defaulted columns.
    fn insert_returning(
        &mut self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let columns: Vec<&'static str> = Self::COLUMNS
                .iter()
                .filter(|c| **c != Self::PRIMARY_KEY)
                .copied()
                .collect();
            let mut params = ParamList::new();
            let mut placeholders = Vec::with_capacity(columns.len());
            for column in &columns {
                let param = self.value_of(column).ok_or_else(|| {
                    Error::validation(format!(
                        "model for table {} has no value for column '{}'",
                        Self::TABLE,
                        column
                    ))
                })?;
                let idx = params.push_param(param);
                placeholders.push(format!("${}", idx));
            }
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                Self::TABLE,
                columns.join(", "),
                placeholders.join(", "),
                Self::COLUMNS.join(", ")
            );
            tracing::debug!(table = Self::TABLE, sql = %sql, "inserting");
            let row = conn.query_one(&sql, &params.as_refs()).await?;
            self.apply_row(&row)
        }
    }
}

impl<M: Model> SaveReturning for M {}

/// INSERT several instances in one statement and materialize the stored
/// rows, database-generated keys included.
///
/// The returned instances are built from the RETURNING rows; their order is
/// whatever the server produced and need not match the input order. A result
/// with fewer rows than inputs (a conflict-skipping trigger, a rule) cannot
/// be matched back and is reported as [`Error::Unsupported`].
pub async fn bulk_insert_returning<M>(conn: &impl GenericClient, rows: Vec<M>) -> Result<Vec<M>>
where
    M: Model + FromRow,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let expected = rows.len();
    let result = qb::insert::<M>().rows(rows).execute(conn).await?;
    if result.len() != expected {
        return Err(Error::unsupported(format!(
            "bulk insert returned {} rows for {} inputs; results cannot be \
             matched back to the input instances",
            result.len(),
            expected
        )));
    }
    result.rows_as::<M>()
}
