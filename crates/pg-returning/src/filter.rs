//! Filter predicates for UPDATE/DELETE statements.
//!
//! A [`Filter`] is a composable boolean expression over columns. Building a
//! filter produces the WHERE-clause SQL with `$n` placeholders whose indices
//! are computed at build time, so a SET clause can precede the WHERE clause
//! without renumbering values.

use crate::param::{Param, ParamList};
use tokio_postgres::types::ToSql;

/// A boolean predicate over table columns.
#[derive(Clone, Debug)]
pub enum Filter {
    /// All inner predicates must hold.
    And(Vec<Filter>),

    /// At least one inner predicate must hold.
    Or(Vec<Filter>),

    /// Negation of the inner predicate.
    Not(Box<Filter>),

    /// `column <op> $n`
    Compare {
        column: String,
        op: &'static str,
        value: Param,
    },

    /// `column IS NULL` / `column IS NOT NULL`
    NullCheck { column: String, is_null: bool },

    /// `column IN ($1, $2, ...)` or the negated form.
    InList {
        column: String,
        values: Vec<Param>,
        negated: bool,
    },

    /// Raw SQL fragment, no parameters.
    Raw(String),

    /// Always true (empty NOT IN).
    True,

    /// Always false (empty IN). A statement filtered by this matches no rows,
    /// so an UPDATE/DELETE ... RETURNING built over it yields an empty set.
    False,
}

impl Filter {
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// `column = value`
    pub fn eq<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: "=",
            value: Param::new(value),
        }
    }

    /// `column != value`
    pub fn ne<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: "!=",
            value: Param::new(value),
        }
    }

    /// `column > value`
    pub fn gt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: ">",
            value: Param::new(value),
        }
    }

    /// `column >= value`
    pub fn gte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: ">=",
            value: Param::new(value),
        }
    }

    /// `column < value`
    pub fn lt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: "<",
            value: Param::new(value),
        }
    }

    /// `column <= value`
    pub fn lte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: "<=",
            value: Param::new(value),
        }
    }

    /// `column LIKE pattern`
    pub fn like<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: "LIKE",
            value: Param::new(pattern),
        }
    }

    /// `column ILIKE pattern`
    pub fn ilike<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Filter::Compare {
            column: column.into(),
            op: "ILIKE",
            value: Param::new(pattern),
        }
    }

    /// `column IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Filter::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Filter::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// `column IN (values...)`. An empty list collapses to [`Filter::False`].
    pub fn in_list<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Filter::False;
        }
        Filter::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (values...)`. An empty list collapses to [`Filter::True`].
    pub fn not_in<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Filter::True;
        }
        Filter::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
            negated: true,
        }
    }

    /// Raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Filter::Raw(sql.into())
    }

    /// Whether the predicate contains no conditions.
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::And(fs) | Filter::Or(fs) => fs.is_empty() || fs.iter().all(|f| f.is_empty()),
            Filter::Not(inner) => inner.is_empty(),
            _ => false,
        }
    }

    /// Build the SQL fragment, pushing parameters into `params`.
    pub fn build(&self, params: &mut ParamList) -> String {
        match self {
            Filter::And(fs) => {
                let parts: Vec<String> = fs
                    .iter()
                    .filter(|f| !f.is_empty())
                    .map(|f| {
                        let sql = f.build(params);
                        if matches!(f, Filter::Or(_)) && !sql.is_empty() {
                            format!("({})", sql)
                        } else {
                            sql
                        }
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
                parts.join(" AND ")
            }
            Filter::Or(fs) => {
                let parts: Vec<String> = fs
                    .iter()
                    .filter(|f| !f.is_empty())
                    .map(|f| {
                        let sql = f.build(params);
                        if matches!(f, Filter::And(_)) && !sql.is_empty() {
                            format!("({})", sql)
                        } else {
                            sql
                        }
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
                parts.join(" OR ")
            }
            Filter::Not(inner) => {
                let sql = inner.build(params);
                if sql.is_empty() {
                    String::new()
                } else {
                    format!("NOT ({})", sql)
                }
            }
            Filter::Compare { column, op, value } => {
                let idx = params.push_param(value.clone());
                format!("{} {} ${}", column, op, idx)
            }
            Filter::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{} IS NULL", column)
                } else {
                    format!("{} IS NOT NULL", column)
                }
            }
            Filter::InList {
                column,
                values,
                negated,
            } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| {
                        let idx = params.push_param(v.clone());
                        format!("${}", idx)
                    })
                    .collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", column, op, placeholders.join(", "))
            }
            Filter::Raw(sql) => sql.clone(),
            Filter::True => "1=1".to_string(),
            Filter::False => "1=0".to_string(),
        }
    }
}

/// Incrementally built conjunction of filters, used as the WHERE clause of
/// the returning builders.
#[derive(Clone, Debug, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Build the WHERE clause content (without the `WHERE` keyword).
    pub fn build(&self) -> (String, ParamList) {
        self.build_with_offset(0)
    }

    /// Build with `offset` placeholders already consumed by a preceding
    /// clause (an UPDATE's SET list).
    pub fn build_with_offset(&self, offset: usize) -> (String, ParamList) {
        let mut params = ParamList::new();
        if self.filters.is_empty() {
            return (String::new(), params);
        }

        let root = Filter::And(self.filters.clone());
        let sql = root.build(&mut params);

        if offset > 0 && !sql.is_empty() {
            (shift_placeholders(&sql, offset), params)
        } else {
            (sql, params)
        }
    }
}

/// Shift every `$n` placeholder in `sql` upward by `offset`.
fn shift_placeholders(sql: &str, offset: usize) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        let mut num = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_digit() {
                num.push(next);
                chars.next();
            } else {
                break;
            }
        }
        result.push('$');
        match num.parse::<usize>() {
            Ok(idx) => result.push_str(&(idx + offset).to_string()),
            Err(_) => result.push_str(&num),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_eq() {
        let mut params = ParamList::new();
        let sql = Filter::eq("name", "alice").build(&mut params);
        assert_eq!(sql, "name = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn conjunction() {
        let mut set = FilterSet::new();
        set.push(Filter::eq("status", "active"));
        set.push(Filter::gt("age", 18i32));
        let (sql, params) = set.build();
        assert_eq!(sql, "status = $1 AND age > $2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn nested_or_is_parenthesized() {
        let filter = Filter::and(vec![
            Filter::eq("status", "active"),
            Filter::or(vec![Filter::eq("role", "admin"), Filter::eq("role", "staff")]),
        ]);
        let mut params = ParamList::new();
        let sql = filter.build(&mut params);
        assert_eq!(sql, "status = $1 AND (role = $2 OR role = $3)");
    }

    #[test]
    fn not_wraps_inner() {
        let mut params = ParamList::new();
        let sql = Filter::not(Filter::eq("banned", true)).build(&mut params);
        assert_eq!(sql, "NOT (banned = $1)");
    }

    #[test]
    fn in_list_placeholders() {
        let mut params = ParamList::new();
        let sql = Filter::in_list("id", vec![1i64, 2, 3]).build(&mut params);
        assert_eq!(sql, "id IN ($1, $2, $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let mut params = ParamList::new();
        let sql = Filter::in_list::<i64>("id", vec![]).build(&mut params);
        assert_eq!(sql, "1=0");
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn empty_not_in_matches_everything() {
        let mut params = ParamList::new();
        let sql = Filter::not_in::<i64>("id", vec![]).build(&mut params);
        assert_eq!(sql, "1=1");
    }

    #[test]
    fn null_checks() {
        let mut params = ParamList::new();
        assert_eq!(
            Filter::is_null("deleted_at").build(&mut params),
            "deleted_at IS NULL"
        );
        assert_eq!(
            Filter::is_not_null("deleted_at").build(&mut params),
            "deleted_at IS NOT NULL"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn offset_shifts_placeholders() {
        let mut set = FilterSet::new();
        set.push(Filter::eq("name", "alice"));
        set.push(Filter::gt("age", 18i32));
        let (sql, params) = set.build_with_offset(3);
        assert_eq!(sql, "name = $4 AND age > $5");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn shift_handles_multi_digit() {
        assert_eq!(shift_placeholders("$1 AND $2 AND $10", 5), "$6 AND $7 AND $15");
    }
}
