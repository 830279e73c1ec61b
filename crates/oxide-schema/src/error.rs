//! Error types for schema operations.

use std::path::PathBuf;

use oxide_blueprint::GrammarError;

/// Errors that can occur while building or applying a schema change.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The blueprint could not be compiled for the selected dialect.
    #[error(transparent)]
    Compile(#[from] GrammarError),

    /// A compiled statement failed against the database.
    ///
    /// Statements before `position` have already been applied.
    #[error("Failed to {operation} '{table}' at statement {position}: {source}\n  {statement}")]
    Execution {
        /// Table the operation targeted.
        table: String,
        /// Builder operation (`create`, `alter`, `drop`, ...).
        operation: &'static str,
        /// Zero-based index of the failing statement.
        position: usize,
        /// The statement that failed.
        statement: String,
        /// Driver error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A table manifest is malformed.
    #[error("Invalid manifest '{path}': {message}")]
    Manifest {
        /// Path of the manifest file (`-` when parsed from a string).
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Database error while connecting.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading manifest files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Returns the position of the failing statement, if execution failed.
    #[must_use]
    pub const fn failed_position(&self) -> Option<usize> {
        match self {
            Self::Execution { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
