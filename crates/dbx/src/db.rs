//! Database handle: a client plus the diagnostics sink its statements go to.

use crate::client::{ExecResult, GenericClient};
use crate::compile::Statement;
use crate::error::{DbxError, DbxResult};
use crate::monitor::{self, DiagnosticsConfig, DiagnosticsSink, FileSink};
use crate::query::Query;
use crate::row::ResultSet;
use std::sync::Arc;

/// Entry point for building queries against one client.
///
/// ```rust,ignore
/// let db = Db::open_sqlite_in_memory()?;
/// let n = db.table("user").count(vec![Selector::gt("uid", 10)]).await?;
/// ```
pub struct Db<C> {
    client: C,
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl<C> std::fmt::Debug for Db<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("own_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: GenericClient> Db<C> {
    /// Wrap a client. Statements go to the process-wide sink current at
    /// dispatch time.
    pub fn new(client: C) -> Self {
        Self { client, sink: None }
    }

    /// Send this handle's statements to `sink` instead of the global one.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Send this handle's statements to a [`FileSink`] built from `config`.
    pub fn with_diagnostics_config(self, config: &DiagnosticsConfig) -> Self {
        self.with_diagnostics(Arc::new(FileSink::new(config)))
    }

    /// The underlying client, for DDL, transactions and raw SQL.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    /// Start a query against `table`.
    pub fn table(&self, name: impl Into<String>) -> Query<'_, C> {
        Query::new(self, name.into())
    }

    fn sink(&self) -> Arc<dyn DiagnosticsSink> {
        match &self.sink {
            Some(sink) => Arc::clone(sink),
            None => monitor::global(),
        }
    }

    /// Log `stmt`, run it as a query, and log the failure if any.
    pub(crate) async fn fetch(&self, stmt: &Statement) -> DbxResult<ResultSet> {
        monitor::report_statement(self.sink().as_ref(), stmt);
        self.client
            .query(&stmt.sql, &stmt.args)
            .await
            .map_err(|e| self.fail(e, stmt))
    }

    /// Log `stmt`, run it as a statement, and log the failure if any.
    pub(crate) async fn exec(&self, stmt: &Statement) -> DbxResult<ExecResult> {
        monitor::report_statement(self.sink().as_ref(), stmt);
        self.client
            .execute(&stmt.sql, &stmt.args)
            .await
            .map_err(|e| self.fail(e, stmt))
    }

    /// Report a failure tied to `stmt` and hand it back.
    pub(crate) fn fail(&self, err: DbxError, stmt: &Statement) -> DbxError {
        monitor::report_error(self.sink().as_ref(), &err, stmt);
        err
    }
}

#[cfg(feature = "sqlite")]
impl Db<crate::sqlite::SqliteClient> {
    /// Open (or create) a SQLite database file.
    pub fn open_sqlite(path: impl AsRef<std::path::Path>) -> DbxResult<Self> {
        Ok(Self::new(crate::sqlite::SqliteClient::open(path)?))
    }

    /// Open a private in-memory SQLite database.
    pub fn open_sqlite_in_memory() -> DbxResult<Self> {
        Ok(Self::new(crate::sqlite::SqliteClient::open_in_memory()?))
    }
}
