//! Derive macros for dbx
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive the `Record` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use dbx::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     #[dbx("uid,auto_increment")]
///     uid: i64,
///     #[dbx("gid")]
///     gid: i64,
///     #[dbx(column = "createDate")]
///     create_date: chrono::NaiveDateTime,
///     // untagged: never read or written
///     cache: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[dbx("column,qualifier,...")]` - Tag string; `auto_increment` as the
///   first qualifier excludes the field from INSERT/UPDATE
/// - `#[dbx(column = "name", auto_increment)]` - Key form
/// - `#[dbx]` - Map the field to a column of the same name
///
/// Tagged field types must implement `dbx::FromValue` and `dbx::ToValue`;
/// the struct must implement `Default`.
#[proc_macro_derive(Record, attributes(dbx))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
