//! # pg-returning
//!
//! PostgreSQL `RETURNING` support for bulk writes: UPDATE, DELETE, and
//! INSERT statements that hand back the affected rows in a single round
//! trip, instead of a write followed by a re-SELECT.
//!
//! ## Highlights
//!
//! - **One round trip**: `update`/`delete`/`insert` builders append a
//!   RETURNING clause and materialize every affected row eagerly
//! - **Type-safe mapping**: rows to structs via the `FromRow` trait; table
//!   metadata via the `Model` trait (both derivable)
//! - **Field selection**: `only()`/`defer()` restrict the RETURNING set;
//!   deferred fields load lazily with one extra query per record
//! - **Instance refresh**: `save_returning`/`insert_returning` write an
//!   instance and update it in place from the stored row
//! - **Safe defaults**: DELETE requires a filter (or an explicit opt-in),
//!   UPDATE requires SET
//! - **Transaction-friendly**: pass a transaction anywhere a
//!   `GenericClient` is expected
//!
//! ## Quick start
//!
//! ```ignore
//! use pg_returning::{FromRow, Model, ReturningStatement, qb};
//!
//! #[derive(FromRow, Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     visits: i32,
//! }
//!
//! // Update matching rows and get them back at once.
//! let updated = qb::update::<User>()
//!     .set_raw("visits", "visits + 1")
//!     .gt("visits", 0i32)
//!     .execute(&client)
//!     .await?;
//!
//! for record in &updated {
//!     let name: String = record.get("name")?;
//!     println!("{name} now has {} visits", record.get::<i32>("visits")?);
//! }
//!
//! // Or decode the whole set into structs.
//! let users: Vec<User> = updated.rows_as()?;
//! ```
//!
//! Row order within a result set follows whatever the server produced and
//! carries no guarantee.

pub mod client;
pub mod error;
pub mod fields;
pub mod filter;
pub mod model;
pub mod param;
pub mod qb;
pub mod record;
pub mod result;
pub mod row;
pub mod save;

mod value;

pub use client::GenericClient;
pub use error::{Error, Result};
pub use fields::FieldSelection;
pub use filter::{Filter, FilterSet};
pub use model::Model;
pub use param::{Param, ParamList};
pub use qb::{DeleteReturning, InsertReturning, ReturningStatement, UpdateReturning};
pub use record::{FieldState, Record};
pub use result::ReturningSet;
pub use row::{FromRow, RowExt};
pub use save::{SaveReturning, bulk_insert_returning};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config, create_pool_with_manager_config};

#[cfg(feature = "derive")]
pub use pg_returning_derive::{FromRow, Model};
