//! # dbx
//!
//! A thin data-access layer over `?`-placeholder SQL databases.
//!
//! ## Features
//!
//! - **Tagged records**: `#[derive(Record)]` maps struct fields to columns, with
//!   auto-generated keys left out of writes
//! - **Selectors and docs**: predicates and write elements compiled into
//!   parameterized SQL, including `IN` expansion and `+col`/`-col` increments
//! - **One cursor, many terminals**: insert, replace, update, delete, count,
//!   typed single/multi reads and generic map reads
//! - **Client agnostic**: anything implementing [`GenericClient`] works; a
//!   SQLite adapter ships behind the `sqlite` feature
//! - **Diagnostics**: every statement goes to `tracing` and an optional
//!   file-based statement/error log
//!
//! ```ignore
//! use dbx::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! struct User {
//!     #[dbx("uid,auto_increment")]
//!     uid: i64,
//!     #[dbx("gid")]
//!     gid: i64,
//!     #[dbx("name")]
//!     name: String,
//! }
//!
//! let db = Db::open_sqlite_in_memory()?;
//! let uid = db.table("user").insert(&User { gid: 1, name: "admin".into(), ..Default::default() }).await?;
//! db.table("user").update(Doc::new().incr("gid", 1), [Selector::eq("uid", uid)]).await?;
//! let users: Vec<User> = db.table("user").sort(["-uid"]).limit(10).all().await?;
//! ```

// Lets derive-generated `::dbx::` paths resolve inside this crate too.
extern crate self as dbx;

pub mod client;
pub mod compile;
pub mod db;
pub mod doc;
pub mod error;
pub mod mapper;
pub mod monitor;
pub mod prelude;
pub mod query;
pub mod record;
pub mod row;
pub mod selector;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use client::{ExecResult, GenericClient};
pub use compile::{Dialect, Statement};
pub use db::Db;
pub use doc::{Doc, DocElem, IntoDoc};
pub use error::{DbxError, DbxResult};
pub use mapper::RowMap;
pub use monitor::{DiagnosticsConfig, DiagnosticsSink, FileSink, NoopSink};
pub use query::Query;
pub use record::{FieldTag, Record, TagMap};
pub use row::{ResultSet, Row};
pub use selector::{Selector, Symbol};
pub use value::{FromValue, ToValue, Value};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteClient;

#[cfg(feature = "derive")]
pub use dbx_derive::Record;
