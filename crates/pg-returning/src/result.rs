//! The eager result container produced by RETURNING statements.

use crate::error::{Error, Result};
use crate::model::Model;
use crate::record::Record;
use crate::row::FromRow;
use serde_json::Value;
use std::sync::Arc;
use tokio_postgres::Row;
use tokio_postgres::types::FromSqlOwned;

/// Rows returned by a single UPDATE/DELETE/INSERT ... RETURNING statement.
///
/// The set is fully materialized when the statement executes; every accessor
/// here reads in-memory data and never re-runs the query. Row order follows
/// whatever the server produced and carries no guarantee.
pub struct ReturningSet<M: Model> {
    records: Vec<Record<M>>,
    fields: Arc<Vec<String>>,
}

impl<M: Model> ReturningSet<M> {
    pub(crate) fn new(rows: Vec<Row>, fields: Vec<String>) -> Self {
        let fields = Arc::new(fields);
        let records = rows
            .into_iter()
            .map(|row| Record::new(row, Arc::clone(&fields)))
            .collect();
        Self { records, fields }
    }

    /// An empty set carrying the model's full column list.
    pub fn empty() -> Self {
        let fields = M::COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::new(Vec::new(), fields)
    }

    /// Column names fetched for every record, in RETURNING order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of affected rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Alias for [`ReturningSet::len`].
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record in server order, or `None` when nothing was affected.
    ///
    /// Without an explicit ordering source, "first" is arbitrary.
    pub fn first(&self) -> Option<&Record<M>> {
        self.records.first()
    }

    /// Last record in server order, or `None` when nothing was affected.
    pub fn last(&self) -> Option<&Record<M>> {
        self.records.last()
    }

    pub fn get(&self, index: usize) -> Option<&Record<M>> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record<M>> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<M>> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Record<M>> {
        self.records.iter_mut()
    }

    pub fn records(&self) -> &[Record<M>] {
        &self.records
    }

    /// Project every record as a JSON object over the fetched fields.
    pub fn values(&self) -> Result<Vec<serde_json::Map<String, Value>>> {
        self.values_for(&self.fields)
    }

    /// Project every record as a JSON object over a subset of fields.
    ///
    /// Names outside the fetched set yield [`Error::Validation`].
    pub fn values_for(&self, fields: &[String]) -> Result<Vec<serde_json::Map<String, Value>>> {
        self.records.iter().map(|r| r.to_json(fields)).collect()
    }

    /// Project every record as a tuple of cell values, in field order.
    ///
    /// At least one field must be named; projecting "all fields" through the
    /// tuple form is ambiguous, use [`ReturningSet::values`] instead.
    pub fn values_list(&self, fields: &[&str]) -> Result<Vec<Vec<Value>>> {
        if fields.is_empty() {
            return Err(Error::validation(
                "values_list requires at least one field name",
            ));
        }
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        self.records.iter().map(|r| r.to_tuple(&fields)).collect()
    }

    /// Typed single-column projection.
    pub fn flat_values<T: FromSqlOwned>(&self, field: &str) -> Result<Vec<T>> {
        self.records.iter().map(|r| r.get(field)).collect()
    }

    /// Decode every record into a typed struct.
    pub fn rows_as<T: FromRow>(&self) -> Result<Vec<T>> {
        self.records.iter().map(|r| r.decode()).collect()
    }

    /// Concatenate two sets fetched with identical field lists.
    ///
    /// Sets with different RETURNING columns cannot be merged and yield
    /// [`Error::Validation`].
    pub fn concat(mut self, other: ReturningSet<M>) -> Result<ReturningSet<M>> {
        if *self.fields != *other.fields {
            return Err(Error::validation(
                "cannot concatenate result sets with different field lists",
            ));
        }
        self.records.extend(other.records);
        Ok(self)
    }
}

impl<M: Model> std::ops::Index<usize> for ReturningSet<M> {
    type Output = Record<M>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a, M: Model> IntoIterator for &'a ReturningSet<M> {
    type Item = &'a Record<M>;
    type IntoIter = std::slice::Iter<'a, Record<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<M: Model> IntoIterator for ReturningSet<M> {
    type Item = Record<M>;
    type IntoIter = std::vec::IntoIter<Record<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<M: Model> std::fmt::Debug for ReturningSet<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturningSet")
            .field("table", &M::TABLE)
            .field("len", &self.records.len())
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;

    struct Book {
        id: i64,
        title: String,
    }

    impl Model for Book {
        const TABLE: &'static str = "books";
        const COLUMNS: &'static [&'static str] = &["id", "title", "pages"];
        const PRIMARY_KEY: &'static str = "id";
        type Pk = i64;

        fn pk(&self) -> i64 {
            self.id
        }

        fn value_of(&self, column: &str) -> Option<Param> {
            match column {
                "id" => Some(Param::new(self.id)),
                "title" => Some(Param::new(self.title.clone())),
                _ => None,
            }
        }

        fn apply_row(&mut self, _row: &Row) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn empty_set_accessors() {
        let set = ReturningSet::<Book>::empty();
        assert_eq!(set.len(), 0);
        assert_eq!(set.count(), 0);
        assert!(set.is_empty());
        assert!(set.first().is_none());
        assert!(set.last().is_none());
        assert!(set.get(0).is_none());
        assert_eq!(set.fields(), &["id", "title", "pages"]);
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn empty_set_projections() {
        let set = ReturningSet::<Book>::empty();
        assert!(set.values().unwrap().is_empty());
        assert!(set.values_list(&["id"]).unwrap().is_empty());
        assert!(set.flat_values::<i64>("id").unwrap().is_empty());
    }

    #[test]
    fn values_list_rejects_empty_field_list() {
        let set = ReturningSet::<Book>::empty();
        let err = set.values_list(&[]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn concat_requires_matching_fields() {
        let a = ReturningSet::<Book>::new(Vec::new(), vec!["id".into(), "title".into()]);
        let b = ReturningSet::<Book>::new(Vec::new(), vec!["id".into()]);
        let err = a.concat(b).unwrap_err();
        assert!(err.is_validation());

        let a = ReturningSet::<Book>::new(Vec::new(), vec!["id".into()]);
        let b = ReturningSet::<Book>::new(Vec::new(), vec!["id".into()]);
        assert_eq!(a.concat(b).unwrap().len(), 0);
    }
}
