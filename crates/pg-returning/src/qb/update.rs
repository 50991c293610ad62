//! UPDATE ... RETURNING builder.

use crate::error::{Error, Result};
use crate::fields::FieldSelection;
use crate::filter::{Filter, FilterSet};
use crate::model::Model;
use crate::param::{Param, ParamList};
use crate::qb::traits::ReturningStatement;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;

enum SetValue {
    Value(Param),
    Raw(String),
}

/// Builder for `UPDATE ... SET ... WHERE ... RETURNING ...`.
///
/// Updates all matching rows and returns them in one round trip. At least
/// one SET assignment is required; an unfiltered builder updates the whole
/// table, which is valid SQL and intentional here (use filters to restrict).
pub struct UpdateReturning<M: Model> {
    sets: Vec<(String, SetValue)>,
    filters: FilterSet,
    selection: FieldSelection,
    _model: PhantomData<M>,
}

impl<M: Model> UpdateReturning<M> {
    pub(crate) fn new() -> Self {
        Self {
            sets: Vec::new(),
            filters: FilterSet::new(),
            selection: FieldSelection::All,
            _model: PhantomData,
        }
    }

    /// Assign `column = value`.
    pub fn set<T: ToSql + Send + Sync + 'static>(
        mut self,
        column: impl Into<String>,
        value: T,
    ) -> Self {
        self.sets.push((column.into(), SetValue::Value(Param::new(value))));
        self
    }

    /// Assign `column = value` from a pre-wrapped parameter.
    pub fn set_param(mut self, column: impl Into<String>, param: Param) -> Self {
        self.sets.push((column.into(), SetValue::Value(param)));
        self
    }

    /// Assign `column = <expr>` with a raw SQL expression, e.g.
    /// `set_raw("visits", "visits + 1")` or `set_raw("updated_at", "now()")`.
    pub fn set_raw(mut self, column: impl Into<String>, expr: impl Into<String>) -> Self {
        self.sets.push((column.into(), SetValue::Raw(expr.into())));
        self
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

    /// `column >= value`
    pub fn gte<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::gte(column, value))
    }

    /// `column < value`
    pub fn lt<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::lt(column, value))
    }

    /// `column <= value`
    pub fn lte<T: ToSql + Send + Sync + 'static>(self, column: impl Into<String>, value: T) -> Self {
        self.filter(Filter::lte(column, value))
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

impl<M: Model> ReturningStatement<M> for UpdateReturning<M> {
    fn build(&self) -> Result<(String, ParamList)> {
        if self.sets.is_empty() {
            return Err(Error::validation("UPDATE requires at least one SET assignment"));
        }

        let mut params = ParamList::new();
        let mut assignments = Vec::with_capacity(self.sets.len());
        for (column, value) in &self.sets {
            if !M::COLUMNS.contains(&column.as_str()) {
                return Err(Error::validation(format!(
                    "unknown column '{}' for table {}",
                    column,
                    M::TABLE
                )));
            }
            match value {
                SetValue::Value(param) => {
                    let idx = params.push_param(param.clone());
                    assignments.push(format!("{} = ${}", column, idx));
                }
                SetValue::Raw(expr) => assignments.push(format!("{} = {}", column, expr)),
            }
        }

        let mut sql = format!("UPDATE {} SET {}", M::TABLE, assignments.join(", "));

        let (where_sql, where_params) = self.filters.build_with_offset(params.len());
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
            params.extend(&where_params);
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
    use crate::qb;
    use tokio_postgres::Row;

    struct User {
        id: i64,
    }

    impl Model for User {
        const TABLE: &'static str = "users";
        const COLUMNS: &'static [&'static str] = &["id", "name", "visits", "updated_at"];
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
    fn update_with_filter() {
        let sql = qb::update::<User>()
            .set("name", "alice")
            .eq("id", 7i64)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE users SET name = $1 WHERE id = $2 RETURNING id, name, visits, updated_at"
        );
    }

    #[test]
    fn set_placeholders_precede_where_placeholders() {
        let (sql, params) = qb::update::<User>()
            .set("name", "alice")
            .set("visits", 3i32)
            .gt("visits", 0i32)
            .eq("name", "bob")
            .build()
            .unwrap();
        assert!(sql.starts_with("UPDATE users SET name = $1, visits = $2 WHERE visits > $3 AND name = $4"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn set_raw_takes_no_placeholder() {
        let (sql, params) = qb::update::<User>()
            .set_raw("visits", "visits + 1")
            .set_raw("updated_at", "now()")
            .eq("id", 1i64)
            .build()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE users SET visits = visits + 1, updated_at = now() WHERE id = $1 \
             RETURNING id, name, visits, updated_at"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn only_restricts_returning() {
        let sql = qb::update::<User>()
            .set("name", "alice")
            .only(&["name"])
            .to_sql()
            .unwrap();
        assert!(sql.ends_with("RETURNING id, name"));
    }

    #[test]
    fn defer_excludes_returning() {
        let sql = qb::update::<User>()
            .set("name", "alice")
            .defer(&["updated_at", "visits"])
            .to_sql()
            .unwrap();
        assert!(sql.ends_with("RETURNING id, name"));
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = qb::update::<User>().eq("id", 1i64).build().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn unknown_set_column_is_rejected() {
        let err = qb::update::<User>().set("nope", 1i32).build().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn by_pk_filters_on_primary_key() {
        let sql = qb::update::<User>()
            .set("visits", 1i32)
            .by_pk(42)
            .to_sql()
            .unwrap();
        assert!(sql.contains("WHERE id = $2"));
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let sql = qb::update::<User>()
            .set("visits", 0i32)
            .in_list::<i64>("id", vec![])
            .to_sql()
            .unwrap();
        assert!(sql.contains("WHERE 1=0"));
    }
}
