//! Derive macros for pg-returning
//!
//! Provides `#[derive(FromRow)]` and `#[derive(Model)]` macros.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_row;
mod model;

/// Derive the `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use pg_returning::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     username: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive the `Model` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use pg_returning::Model;
///
/// #[derive(Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     id: i64,
///     username: String,
///     email: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `TABLE` - Table name
/// - `COLUMNS` - Column names in field declaration order
/// - `PRIMARY_KEY` / `type Pk` - Primary key column and Rust type
/// - `pk()` / `value_of()` / `apply_row()` - Per-instance column access
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Specify table name (required)
/// - `#[orm(id)]` - Mark field as primary key (required on exactly one field)
/// - `#[orm(column = "name")]` - Map field to different column name
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
