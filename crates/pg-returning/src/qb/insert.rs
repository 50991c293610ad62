//! INSERT ... RETURNING builder.

use crate::error::{Error, Result};
use crate::fields::FieldSelection;
use crate::model::Model;
use crate::param::ParamList;
use crate::qb::traits::ReturningStatement;

/// Builder for multi-row `INSERT INTO ... VALUES ... RETURNING ...`.
///
/// Values are taken from model instances. The primary key column is omitted
/// from the column list by default so the database generates it; the
/// generated keys come back through RETURNING. Use
/// [`InsertReturning::include_pk`] for tables with client-assigned keys.
pub struct InsertReturning<M: Model> {
    rows: Vec<M>,
    selection: FieldSelection,
    include_pk: bool,
    ignore_conflicts: bool,
}

impl<M: Model> InsertReturning<M> {
    pub(crate) fn new() -> Self {
        Self {
            rows: Vec::new(),
            selection: FieldSelection::All,
            include_pk: false,
            ignore_conflicts: false,
        }
    }

    /// Add one instance to insert.
    pub fn row(mut self, instance: M) -> Self {
        self.rows.push(instance);
        self
    }

    /// Add several instances to insert.
    pub fn rows(mut self, instances: impl IntoIterator<Item = M>) -> Self {
        self.rows.extend(instances);
        self
    }

    /// Insert the primary key column instead of letting the database
    /// generate it.
    pub fn include_pk(mut self) -> Self {
        self.include_pk = true;
        self
    }

    /// Request `ON CONFLICT DO NOTHING` semantics.
    ///
    /// This combination is refused at build time: when conflicting rows are
    /// silently skipped, RETURNING reports only the inserted subset and the
    /// result can no longer be matched back to the input instances.
    pub fn ignore_conflicts(mut self) -> Self {
        self.ignore_conflicts = true;
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

    /// Number of staged rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn insert_columns(&self) -> Vec<&'static str> {
        M::COLUMNS
            .iter()
            .filter(|c| self.include_pk || **c != M::PRIMARY_KEY)
            .copied()
            .collect()
    }
}

impl<M: Model> ReturningStatement<M> for InsertReturning<M> {
    fn build(&self) -> Result<(String, ParamList)> {
        if self.ignore_conflicts {
            return Err(Error::unsupported(
                "ignore_conflicts cannot be combined with RETURNING: skipped rows \
                 make the result set unmatchable to the input",
            ));
        }
        if self.rows.is_empty() {
            return Err(Error::validation("INSERT requires at least one row"));
        }

        let columns = self.insert_columns();
        let mut params = ParamList::new();
        let mut groups = Vec::with_capacity(self.rows.len());
        for instance in &self.rows {
            let mut placeholders = Vec::with_capacity(columns.len());
            for column in &columns {
                let param = instance.value_of(column).ok_or_else(|| {
                    Error::validation(format!(
                        "model for table {} has no value for column '{}'",
                        M::TABLE,
                        column
                    ))
                })?;
                let idx = params.push_param(param);
                placeholders.push(format!("${}", idx));
            }
            groups.push(format!("({})", placeholders.join(", ")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {} RETURNING {}",
            M::TABLE,
            columns.join(", "),
            groups.join(", "),
            self.returning_fields()?.join(", ")
        );

        Ok((sql, params))
    }

    fn returning_fields(&self) -> Result<Vec<String>> {
        self.selection.resolve::<M>()
    }

    // Inserting nothing affects nothing; skip the round trip.
    fn is_no_op(&self) -> bool {
        self.rows.is_empty() && !self.ignore_conflicts
    }
}
