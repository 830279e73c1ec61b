//! Error types for blueprint compilation.

use crate::dialect::Dialect;

/// Errors raised while compiling a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// The dialect cannot express the requested alteration.
    #[error("{dialect} does not support {operation} on table '{table}'")]
    Unsupported {
        /// Dialect that rejected the operation.
        dialect: Dialect,
        /// Operation name (e.g. "modify column").
        operation: &'static str,
        /// Table being altered.
        table: String,
    },
}

/// Returned when a dialect identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown SQL dialect: '{0}'")]
pub struct UnknownDialectError(pub String);

/// Result type for blueprint compilation.
pub type Result<T> = std::result::Result<T, GrammarError>;
