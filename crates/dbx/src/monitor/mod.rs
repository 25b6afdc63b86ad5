//! Statement diagnostics.
//!
//! Every statement the query builder dispatches is reported twice: as a
//! `tracing` event on target `dbx.sql`, and to a [`DiagnosticsSink`]. The
//! sink is either set per [`Db`](crate::Db) or taken from the process-wide
//! slot filled by [`install`].
//!
//! # Example
//!
//! ```rust,ignore
//! use dbx::monitor::{self, DiagnosticsConfig};
//!
//! monitor::install(
//!     &DiagnosticsConfig::new()
//!         .with_log_file("/tmp/dbx.log")
//!         .with_error_log_file("/tmp/dbx-error.log"),
//! );
//! ```

mod config;
mod sink;


pub use config::{DiagnosticsConfig, ERROR_LOG_FILE_ENV, LOG_FILE_ENV};
pub use sink::{DiagnosticsSink, FileSink, NoopSink};

use crate::compile::Statement;
use crate::error::DbxError;
use crate::value::Value;
use std::sync::{Arc, OnceLock, RwLock};

type SharedSink = Arc<dyn DiagnosticsSink>;

fn slot() -> &'static RwLock<SharedSink> {
    static GLOBAL: OnceLock<RwLock<SharedSink>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Arc::new(NoopSink)))
}

/// Replace the process-wide sink with a [`FileSink`] for `config`.
///
/// A configuration without destinations installs the no-op sink.
pub fn install(config: &DiagnosticsConfig) {
    let sink: SharedSink = if config.is_enabled() {
        Arc::new(FileSink::new(config))
    } else {
        Arc::new(NoopSink)
    };
    set_global(sink);
}

/// Replace the process-wide sink.
pub fn set_global(sink: Arc<dyn DiagnosticsSink>) {
    match slot().write() {
        Ok(mut guard) => *guard = sink,
        Err(poisoned) => *poisoned.into_inner() = sink,
    }
}

/// The current process-wide sink.
pub fn global() -> Arc<dyn DiagnosticsSink> {
    match slot().read() {
        Ok(guard) => Arc::clone(&*guard),
        Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
    }
}

/// Substitute each `?` with the next argument in single quotes.
///
/// Text arguments have `\` and `'` backslash-escaped. Placeholders without a
/// matching argument are left as `?`. The result is for reading only and is
/// never executed.
pub fn render_statement(sql: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(sql.len() + args.len() * 8);
    let mut args = args.iter();
    for ch in sql.chars() {
        if ch != '?' {
            out.push(ch);
            continue;
        }
        match args.next() {
            Some(arg) => {
                out.push('\'');
                match arg {
                    Value::Text(s) => push_escaped(&mut out, s),
                    other => out.push_str(&other.to_string()),
                }
                out.push('\'');
            }
            None => out.push('?'),
        }
    }
    out
}

fn push_escaped(out: &mut String, s: &str) {
    for ch in s.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
}

pub(crate) fn report_statement(sink: &dyn DiagnosticsSink, stmt: &Statement) {
    tracing::debug!(
        target: "dbx.sql",
        param_count = stmt.args.len(),
        sql = %stmt.sql,
    );
    sink.statement(stmt);
}

pub(crate) fn report_error(sink: &dyn DiagnosticsSink, err: &DbxError, stmt: &Statement) {
    tracing::error!(
        target: "dbx.sql",
        error = %err,
        sql = %stmt.sql,
        "statement failed"
    );
    sink.error(err, stmt);
}
