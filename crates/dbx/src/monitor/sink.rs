use super::config::DiagnosticsConfig;
use super::render_statement;
use crate::compile::Statement;
use crate::error::DbxError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Write-only destination for executed statements and their failures.
pub trait DiagnosticsSink: Send + Sync {
    /// Called once per statement, before it is dispatched.
    fn statement(&self, stmt: &Statement);

    /// Called when a statement (or mapping its result) failed.
    fn error(&self, err: &DbxError, stmt: &Statement);
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn statement(&self, _stmt: &Statement) {}

    fn error(&self, _err: &DbxError, _stmt: &Statement) {}
}

/// Appends rendered statements to plain-text log files.
#[derive(Debug, Default)]
pub struct FileSink {
    statements: Option<LogFile>,
    errors: Option<LogFile>,
}

impl FileSink {
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self {
            statements: config.log_file.clone().map(LogFile::new),
            errors: config.error_log_file.clone().map(LogFile::new),
        }
    }
}

impl DiagnosticsSink for FileSink {
    fn statement(&self, stmt: &Statement) {
        if let Some(log) = &self.statements {
            log.append(&format!(
                "{} | {}\n",
                timestamp(),
                render_statement(&stmt.sql, &stmt.args)
            ));
        }
    }

    fn error(&self, err: &DbxError, stmt: &Statement) {
        if let Some(log) = &self.errors {
            log.append(&format!(
                "{} | ERROR: {err} | SQL: {}\n",
                timestamp(),
                render_statement(&stmt.sql, &stmt.args)
            ));
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A log file opened on first write. A failed open is not retried.
#[derive(Debug)]
struct LogFile {
    path: PathBuf,
    file: OnceLock<Option<Mutex<File>>>,
}

impl LogFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: OnceLock::new(),
        }
    }

    fn append(&self, line: &str) {
        let Some(file) = self.file.get_or_init(|| open_append(&self.path)) else {
            return;
        };
        let Ok(mut file) = file.lock() else {
            tracing::warn!(target: "dbx.sql", path = %self.path.display(), "diagnostics log mutex poisoned");
            return;
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!(
                target: "dbx.sql",
                path = %self.path.display(),
                error = %e,
                "failed to write diagnostics log"
            );
        }
    }
}

fn open_append(path: &Path) -> Option<Mutex<File>> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(Mutex::new(file)),
        Err(e) => {
            tracing::warn!(
                target: "dbx.sql",
                path = %path.display(),
                error = %e,
                "failed to open diagnostics log"
            );
            None
        }
    }
}
