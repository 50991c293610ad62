//! Builders for write statements with RETURNING clauses.
//!
//! Each builder produces a single SQL statement that performs the write and
//! fetches the affected rows in one round trip:
//!
//! ```ignore
//! use pg_returning::qb;
//! use pg_returning::ReturningStatement;
//!
//! let updated = qb::update::<User>()
//!     .set("name", "alice")
//!     .eq("id", 7i64)
//!     .execute(&client)
//!     .await?;
//! assert_eq!(updated.count(), 1);
//! ```

mod delete;
mod insert;
mod traits;
mod update;

pub use delete::DeleteReturning;
pub use insert::InsertReturning;
pub use traits::ReturningStatement;
pub use update::UpdateReturning;

use crate::model::Model;

/// Start an `UPDATE ... RETURNING` statement for model `M`.
pub fn update<M: Model>() -> UpdateReturning<M> {
    UpdateReturning::new()
}

/// Start a `DELETE ... RETURNING` statement for model `M`.
pub fn delete<M: Model>() -> DeleteReturning<M> {
    DeleteReturning::new()
}

/// Start an `INSERT ... RETURNING` statement for model `M`.
pub fn insert<M: Model>() -> InsertReturning<M> {
    InsertReturning::new()
}
