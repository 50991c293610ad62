//! RETURNING column selection.
//!
//! Resolves which columns a statement requests in its RETURNING clause:
//! every concrete model column by default, or an `only`/`defer` restricted
//! subset. The primary key is always forced into the set — it is required to
//! reconstruct row identity and to key deferred-field fetches.

use crate::error::{Error, Result};
use crate::model::Model;

/// Which columns to request in RETURNING.
#[derive(Clone, Debug, Default)]
pub enum FieldSelection {
    /// All concrete columns of the model.
    #[default]
    All,
    /// Only the named columns (plus the primary key).
    Only(Vec<String>),
    /// All columns except the named ones (the primary key is kept even if
    /// named here).
    Defer(Vec<String>),
}

impl FieldSelection {
    /// Resolve the selection into an ordered column list for model `M`.
    ///
    /// Order follows `M::COLUMNS` declaration order. Unknown field names are
    /// rejected with [`Error::Validation`] before any SQL is issued.
    pub fn resolve<M: Model>(&self) -> Result<Vec<String>> {
        match self {
            FieldSelection::All => Ok(M::COLUMNS.iter().map(|c| c.to_string()).collect()),
            FieldSelection::Only(names) => {
                validate_names::<M>(names)?;
                Ok(M::COLUMNS
                    .iter()
                    .filter(|c| **c == M::PRIMARY_KEY || names.iter().any(|n| n == *c))
                    .map(|c| c.to_string())
                    .collect())
            }
            FieldSelection::Defer(names) => {
                validate_names::<M>(names)?;
                Ok(M::COLUMNS
                    .iter()
                    .filter(|c| **c == M::PRIMARY_KEY || !names.iter().any(|n| n == *c))
                    .map(|c| c.to_string())
                    .collect())
            }
        }
    }
}

fn validate_names<M: Model>(names: &[String]) -> Result<()> {
    for name in names {
        if !M::COLUMNS.contains(&name.as_str()) {
            return Err(Error::validation(format!(
                "unknown field '{}' for table {}",
                name,
                M::TABLE
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use tokio_postgres::Row;

    struct Book;

    impl Model for Book {
        const TABLE: &'static str = "books";
        const COLUMNS: &'static [&'static str] = &["id", "title", "pages"];
        const PRIMARY_KEY: &'static str = "id";
        type Pk = i64;

        fn pk(&self) -> i64 {
            0
        }
        fn value_of(&self, _column: &str) -> Option<Param> {
            None
        }
        fn apply_row(&mut self, _row: &Row) -> crate::error::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn all_selects_every_column() {
        let cols = FieldSelection::All.resolve::<Book>().unwrap();
        assert_eq!(cols, vec!["id", "title", "pages"]);
    }

    #[test]
    fn only_keeps_declaration_order() {
        let sel = FieldSelection::Only(vec!["pages".into(), "title".into()]);
        let cols = sel.resolve::<Book>().unwrap();
        assert_eq!(cols, vec!["id", "title", "pages"]);
    }

    #[test]
    fn only_without_pk_still_includes_pk() {
        let sel = FieldSelection::Only(vec!["pages".into()]);
        let cols = sel.resolve::<Book>().unwrap();
        assert_eq!(cols, vec!["id", "pages"]);
    }

    #[test]
    fn defer_removes_named_but_keeps_pk() {
        let sel = FieldSelection::Defer(vec!["title".into(), "id".into()]);
        let cols = sel.resolve::<Book>().unwrap();
        assert_eq!(cols, vec!["id", "pages"]);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let sel = FieldSelection::Only(vec!["isbn".into()]);
        let err = sel.resolve::<Book>().unwrap_err();
        assert!(err.is_validation());
    }
}
