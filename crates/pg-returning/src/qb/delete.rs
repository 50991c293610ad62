//! DELETE ... RETURNING builder.

use crate::error::Result;
use crate::fields::FieldSelection;
use crate::filter::{Filter, FilterSet};
use crate::model::Model;
use crate::param::ParamList;
use crate::qb::traits::ReturningStatement;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;

/// Builder for `DELETE FROM ... WHERE ... RETURNING ...`.
///
/// Deletes all matching rows and returns them in one round trip. An
/// unfiltered DELETE is refused by default: without filters the statement is
/// built with `WHERE 1=0` unless [`DeleteReturning::allow_delete_all`] is
/// called explicitly.
pub struct DeleteReturning<M: Model> {
    filters: FilterSet,
    selection: FieldSelection,
    delete_all: bool,
    _model: PhantomData<M>,
}

impl<M: Model> DeleteReturning<M> {
    pub(crate) fn new() -> Self {
        Self {
            filters: FilterSet::new(),
            selection: FieldSelection::All,
            delete_all: false,
            _model: PhantomData,
        }
    }

    /// Add an arbitrary filter to the WHERE conjunction.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// `column = value`
    pub fn eq<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::eq(column, value))
    }

    /// `column != value`
    pub fn ne<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::ne(column, value))
    }

    /// `column > value`
    pub fn gt<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::gt(column, value))
    }

    /// `column < value`
    pub fn lt<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::lt(column, value))
    }

    /// `column IN (values...)`. An empty list matches no rows.
    pub fn in_list<T: ToSql + Send + Sync + 'static>(
        self,
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        self.filter(Filter::in_list(column, values))
    }

    /// `column IS NULL`
    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.filter(Filter::is_null(column))
    }

    /// Raw WHERE fragment.
    pub fn raw_filter(self, sql: impl Into<String>) -> Self {
        self.filter(Filter::raw(sql))
    }

    /// Restrict by primary key.
    pub fn by_pk(self, pk: M::Pk) -> Self {
        self.filter(Filter::eq(M::PRIMARY_KEY, pk))
    }

    /// Permit a DELETE with no filters to hit the whole table.
    pub fn allow_delete_all(mut self) -> Self {
        self.delete_all = true;
        self
    }

    /// Return only the named columns (the primary key is always included).
    pub fn only(mut self, fields: &[&str]) -> Self {
        self.selection = FieldSelection::Only(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Return all columns except the named ones.
    pub fn defer(mut self, fields: &[&str]) -> Self {
        self.selection = FieldSelection::Defer(fields.iter().map(|f| f.to_string()).collect());
        self
    }
}

impl<M: Model> ReturningStatement<M> for DeleteReturning<M> {
    fn build(&self) -> Result<(String, ParamList)> {
        let mut sql = format!("DELETE FROM {}", M::TABLE);

        let (where_sql, params) = self.filters.build();
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        } else if !self.delete_all {
            sql.push_str(" WHERE 1=0");
        }

        sql.push_str(" RETURNING ");
        sql.push_str(&self.returning_fields()?.join(", "));

        Ok((sql, params))
    }

    fn returning_fields(&self) -> Result<Vec<String>> {
        self.selection.resolve::<M>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::qb;
    use tokio_postgres::Row;

    struct Session {
        id: i64,
    }

    impl Model for Session {
        const TABLE: &'static str = "sessions";
        const COLUMNS: &'static [&'static str] = &["id", "user_id", "expires_at"];
        const PRIMARY_KEY: &'static str = "id";
        type Pk = i64;

        fn pk(&self) -> i64 {
            self.id
        }
        fn value_of(&self, _column: &str) -> Option<Param> {
            None
        }
        fn apply_row(&mut self, _row: &Row) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn delete_with_filter() {
        let (sql, params) = qb::delete::<Session>().eq("user_id", 9i64).build().unwrap();
        assert_eq!(
            sql,
            "DELETE FROM sessions WHERE user_id = $1 RETURNING id, user_id, expires_at"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn unfiltered_delete_matches_nothing_by_default() {
        let sql = qb::delete::<Session>().to_sql().unwrap();
        assert_eq!(
            sql,
            "DELETE FROM sessions WHERE 1=0 RETURNING id, user_id, expires_at"
        );
    }

    #[test]
    fn delete_all_requires_opt_in() {
        let sql = qb::delete::<Session>().allow_delete_all().to_sql().unwrap();
        assert_eq!(
            sql,
            "DELETE FROM sessions RETURNING id, user_id, expires_at"
        );
    }

    #[test]
    fn only_restricts_returning() {
        let sql = qb::delete::<Session>()
            .by_pk(4)
            .only(&["user_id"])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM sessions WHERE id = $1 RETURNING id, user_id");
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let sql = qb::delete::<Session>()
            .in_list::<i64>("id", vec![])
            .to_sql()
            .unwrap();
        assert!(sql.contains("WHERE 1=0"));
    }
}
