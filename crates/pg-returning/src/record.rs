//! Materialized records returned by RETURNING statements.

use crate::client::GenericClient;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::row::{FromRow, RowExt};
use crate::value::cell_to_json;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_postgres::Row;
use tokio_postgres::types::FromSqlOwned;

/// Load state of one model field on a [`Record`].
///
/// Fields inside the statement's RETURNING column set are `Loaded`; the
/// rest are `Deferred` until [`Record::load`] fetches them on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    /// The field was requested in RETURNING (or fetched later) and its
    /// value is available in memory.
    Loaded,
    /// The field was not requested; reading it requires a database fetch.
    Deferred,
}

/// One row returned by an UPDATE/DELETE/INSERT ... RETURNING statement,
/// interpreted against model `M`.
///
/// Only the columns of the statement's RETURNING set are populated. The
/// primary key is always among them. Reading any other model column with
/// [`Record::load`] triggers a single additional SELECT (all missing columns
/// at once, keyed by primary key), cached for the record's lifetime.
pub struct Record<M: Model> {
    row: Row,
    fields: Arc<Vec<String>>,
    deferred: Option<Row>,
    _model: PhantomData<M>,
}

impl<M: Model> Record<M> {
    pub(crate) fn new(row: Row, fields: Arc<Vec<String>>) -> Self {
        Self {
            row,
            fields,
            deferred: None,
            _model: PhantomData,
        }
    }

    /// Column names populated on this record, in RETURNING order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Load state of a model field.
    ///
    /// Returns an error for names that are not columns of `M` at all.
    pub fn state(&self, field: &str) -> Result<FieldState> {
        if !M::COLUMNS.contains(&field) {
            return Err(Error::validation(format!(
                "unknown field '{}' for table {}",
                field,
                M::TABLE
            )));
        }
        if self.is_loaded(field) {
            Ok(FieldState::Loaded)
        } else {
            Ok(FieldState::Deferred)
        }
    }

    fn is_loaded(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field) || self.deferred.is_some()
    }

    /// Typed access to a loaded field.
    ///
    /// Deferred fields yield [`Error::Validation`]; use [`Record::load`] to
    /// fetch them.
    pub fn get<T: FromSqlOwned>(&self, field: &str) -> Result<T> {
        self.state(field)?;
        if self.fields.iter().any(|f| f == field) {
            return self.row.try_get_column(field);
        }
        match &self.deferred {
            Some(row) => row.try_get_column(field),
            None => Err(Error::validation(format!(
                "field '{}' is deferred; call load() to fetch it",
                field
            ))),
        }
    }

    /// The record's primary key value.
    pub fn pk(&self) -> Result<M::Pk> {
        self.row.try_get_column(M::PRIMARY_KEY)
    }

    /// Typed access to any model field, fetching deferred columns on demand.
    ///
    /// The first deferred read issues exactly one single-row SELECT covering
    /// every column missing from the RETURNING set; the fetched row is cached
    /// so later deferred reads on this record hit memory.
    pub async fn load<T: FromSqlOwned>(
        &mut self,
        conn: &impl GenericClient,
        field: &str,
    ) -> Result<T> {
        self.state(field)?;
        if self.fields.iter().any(|f| f == field) {
            return self.row.try_get_column(field);
        }

        if self.deferred.is_none() {
            let missing: Vec<&str> = M::COLUMNS
                .iter()
                .filter(|c| !self.fields.iter().any(|f| f == **c))
                .copied()
                .collect();
            let sql = format!(
                "SELECT {} FROM {} WHERE {} = $1",
                missing.join(", "),
                M::TABLE,
                M::PRIMARY_KEY
            );
            let pk = self.pk()?;
            tracing::trace!(table = M::TABLE, field, "fetching deferred fields");
            self.deferred = Some(conn.query_one(&sql, &[&pk]).await?);
        }
        let Some(row) = self.deferred.as_ref() else {
            return Err(Error::decode(field, "deferred row unavailable"));
        };
        row.try_get_column(field)
    }

    /// Project the loaded fields (or a subset) as a JSON object.
    pub(crate) fn to_json(&self, fields: &[String]) -> Result<serde_json::Map<String, Value>> {
        let mut map = serde_json::Map::with_capacity(fields.len());
        for field in fields {
            let idx = self
                .fields
                .iter()
                .position(|f| f == field)
                .ok_or_else(|| {
                    Error::validation(format!("field '{}' was not fetched by this query", field))
                })?;
            map.insert(field.clone(), cell_to_json(&self.row, idx)?);
        }
        Ok(map)
    }

    /// Cell values for the named fields, in the given order.
    pub(crate) fn to_tuple(&self, fields: &[String]) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(fields.len());
        for field in fields {
            let idx = self
                .fields
                .iter()
                .position(|f| f == field)
                .ok_or_else(|| {
                    Error::validation(format!("field '{}' was not fetched by this query", field))
                })?;
            out.push(cell_to_json(&self.row, idx)?);
        }
        Ok(out)
    }

    /// Convert the record into a typed struct.
    ///
    /// Requires every column the target's `FromRow` reads to be present in
    /// the RETURNING set; a partial record yields a decode error.
    pub fn decode<T: FromRow>(&self) -> Result<T> {
        T::from_row(&self.row)
    }

    pub(crate) fn row(&self) -> &Row {
        &self.row
    }
}

impl<M: Model> std::fmt::Debug for Record<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("table", &M::TABLE)
            .field("fields", &self.fields)
            .field("deferred_fetched", &self.deferred.is_some())
            .finish()
    }
}
