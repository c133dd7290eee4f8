use alloy_primitives::hex::FromHexError;
use rain_interpreter::{ContextError, EvalError, IntegrityError};

/// Error types for the rain-eval commands
#[derive(Debug, thiserror::Error)]
pub enum EvalCliError {
    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON input
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// The offending file
        path: String,
        /// The parser error
        source: serde_json::Error,
    },

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// The expression failed its integrity check
    #[error("Integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    /// A signed context did not verify
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    /// The evaluation reverted
    #[error("Evaluation reverted: {0}")]
    Eval(#[from] EvalError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for the rain-eval commands
pub type Result<T> = std::result::Result<T, EvalCliError>;
