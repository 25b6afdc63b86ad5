use crate::error::{DbxError, DbxResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the statement log file.
pub const LOG_FILE_ENV: &str = "DBX_LOG_FILE";
/// Environment variable naming the error log file.
pub const ERROR_LOG_FILE_ENV: &str = "DBX_ERROR_LOG_FILE";

/// Where the file diagnostics sink writes.
///
/// Both destinations are optional; an unset path disables that log.
///
/// ```toml
/// log_file = "/var/log/app/sql.log"
/// error_log_file = "/var/log/app/sql-error.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Every executed statement is appended here.
    pub log_file: Option<PathBuf>,
    /// Failed statements and their errors are appended here.
    pub error_log_file: Option<PathBuf>,
}

impl DiagnosticsConfig {
    /// Create a configuration with both logs disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the statement log path.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Set the error log path.
    pub fn with_error_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log_file = Some(path.into());
        self
    }

    /// Read `DBX_LOG_FILE` and `DBX_ERROR_LOG_FILE`. Empty values count as unset.
    pub fn from_env() -> Self {
        fn path_var(name: &str) -> Option<PathBuf> {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        }

        Self {
            log_file: path_var(LOG_FILE_ENV),
            error_log_file: path_var(ERROR_LOG_FILE_ENV),
        }
    }

    pub fn from_toml_str(source: &str) -> DbxResult<Self> {
        toml::from_str(source).map_err(|e| DbxError::Config(e.to_string()))
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> DbxResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| DbxError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// True when at least one destination is configured.
    pub fn is_enabled(&self) -> bool {
        self.log_file.is_some() || self.error_log_file.is_some()
    }
}
