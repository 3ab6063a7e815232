//! Error types for rowsql

use thiserror::Error;

/// Result type alias for rowsql operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement assembly and driver calls
#[derive(Debug, Error)]
pub enum OrmError {
    /// No key field of the row could be matched, so the row cannot be targeted
    #[error("No key found for updating the row! (table '{table}')")]
    NoKey { table: String },

    /// A by-id operation was asked to work on a composite key
    #[error("Split keys are not supported for by-id access on '{table}' ({count} key fields)")]
    SplitKey { table: String, count: usize },

    /// Failure reported by the driver collaborator
    #[error("Driver error: {0}")]
    Driver(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Statement would be malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Key configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a missing key error for a table
    pub fn no_key(table: impl Into<String>) -> Self {
        Self::NoKey {
            table: table.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a driver failure
    pub fn driver(message: impl std::fmt::Display) -> Self {
        Self::Driver(message.to_string())
    }

    /// Check if this is a missing key error
    pub fn is_no_key(&self) -> bool {
        matches!(self, Self::NoKey { .. })
    }

    /// Check if this is a split key error
    pub fn is_split_key(&self) -> bool {
        matches!(self, Self::SplitKey { .. })
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
