//! Error types for dbx

use thiserror::Error;

/// Result type alias for dbx operations
pub type DbxResult<T> = Result<T, DbxError>;

/// Error types for query building, row mapping and execution
#[derive(Debug, Error)]
pub enum DbxError {
    /// The destination cannot receive a bound column
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// A scanned value does not fit the destination field
    #[error("Type mismatch on column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    /// An `IN` selector value is not a sequence of integers or strings
    #[error("Unsupported value type for IN on '{field}': {found}")]
    UnsupportedValueType { field: String, found: String },

    /// A selector symbol outside the supported vocabulary
    #[error("Invalid selector symbol: {0:?}")]
    InvalidSymbol(String),

    /// Single-record read matched no rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed write elements or builder input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure surfaced by the underlying SQL client
    #[error("Client error: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration loading error
    #[error("Config error: {0}")]
    Config(String),
}

impl DbxError {
    /// Create a type mismatch error for a specific column
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap any client-side error
    pub fn client(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Client(err.into())
    }

    /// Attach a column name to a type mismatch raised before the column was known.
    pub(crate) fn in_column(self, column: &str) -> Self {
        match self {
            Self::TypeMismatch {
                expected, found, ..
            } => Self::TypeMismatch {
                column: column.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an unsupported `IN` value error
    pub fn is_unsupported_value_type(&self) -> bool {
        matches!(self, Self::UnsupportedValueType { .. })
    }

    /// Check if this error came from the underlying client
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DbxError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Client(Box::new(err))
    }
}

impl From<tokio::task::JoinError> for DbxError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Client(Box::new(err))
    }
}
