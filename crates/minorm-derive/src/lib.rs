//! Derive macros for minorm
//!
//! Provides `#[derive(Model)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod from_row;
mod model;
mod sql_ident;

/// Derive `Model` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use minorm::{FromRow, Model};
///
/// #[derive(Debug, Default, Model, FromRow)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(tag = "PRIMARY KEY")]
///     name: String,
///     age: i32,
///     #[orm(skip)]
///     cache: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `impl minorm::Model`: `TABLE`, `columns()` and `values()` in field order
/// - an empty `impl minorm::Hooks`, unless `#[orm(hooks)]` is given
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the struct name)
/// - `#[orm(hooks)]` - The struct implements `minorm::Hooks` itself
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(tag = "...")]` - Constraint text appended to the column in `CREATE TABLE`
/// - `#[orm(skip)]` - Not a column
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` trait for a struct.
///
/// Columns are read by position in field declaration order, skipping
/// `#[orm(skip)]` fields, which are filled with `Default::default()`. A row
/// with a different number of columns is a decode error.
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
