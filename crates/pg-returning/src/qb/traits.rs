//! Shared statement interface for the returning builders.

use crate::client::GenericClient;
use crate::error::Result;
use crate::model::Model;
use crate::param::ParamList;
use crate::result::ReturningSet;

/// A write statement that returns its affected rows.
///
/// Implemented by the UPDATE/DELETE/INSERT builders. Building is pure and
/// fallible; execution runs the single statement and materializes every
/// returned row into a [`ReturningSet`].
pub trait ReturningStatement<M: Model>: Send + Sync {
    /// Build the SQL text and its parameters.
    fn build(&self) -> Result<(String, ParamList)>;

    /// The columns this statement's RETURNING clause requests.
    fn returning_fields(&self) -> Result<Vec<String>>;

    /// Whether the statement provably affects no rows, so execution can skip
    /// the round trip entirely (an INSERT of zero rows).
    fn is_no_op(&self) -> bool {
        false
    }

    /// The SQL text, for logging and tests.
    fn to_sql(&self) -> Result<String> {
        Ok(self.build()?.0)
    }

    /// Execute the statement and materialize the returned rows.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = Result<ReturningSet<M>>> + Send
    where
        Self: Sized,
    {
        async move {
            let fields = self.returning_fields()?;
            if self.is_no_op() {
                return Ok(ReturningSet::new(Vec::new(), fields));
            }
            let (sql, params) = self.build()?;
            let rows = conn.query(&sql, &params.as_refs()).await?;
            tracing::debug!(table = M::TABLE, sql = %sql, rows = rows.len(), "executed");
            Ok(ReturningSet::new(rows, fields))
        }
    }
}
