//! Convenient imports for typical `dbx` usage.
//!
//! ```ignore
//! use dbx::prelude::*;
//! ```

pub use crate::{
    Db, DbxError, DbxResult, Doc, DocElem, FromValue, GenericClient, Record, RowMap, Selector,
    ToValue, Value,
};

#[cfg(feature = "sqlite")]
pub use crate::SqliteClient;
