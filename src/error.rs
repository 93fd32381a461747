//! Error types for rushkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RushError
pub type Result<T> = std::result::Result<T, RushError>;

/// Unified error type for rushkv operations
#[derive(Debug, Error)]
pub enum RushError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Wrong value type for key '{key}'")]
    WrongType { key: String },

    #[error("Value of key '{key}' is not an integer")]
    NotAnInteger { key: String },

    #[error("Integer overflow on key '{key}'")]
    IntegerOverflow { key: String },

    // -------------------------------------------------------------------------
    // Transaction Errors
    // -------------------------------------------------------------------------
    #[error("Malformed record: {0}")]
    InvalidRecord(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server executed the call and reported a failure
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Connection pool timeout")]
    PoolTimeout,

    #[error("Server is not running")]
    ServerStopped,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for RushError {
    fn from(err: bincode::Error) -> Self {
        RushError::Serialization(err.to_string())
    }
}

impl RushError {
    /// Whether this error came from the transport rather than the store.
    ///
    /// Connection-level failures (refused dial, timeout, mid-call disconnect)
    /// are always retryable by re-acquiring or redialing.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            RushError::Io(_) | RushError::Network(_) | RushError::PoolTimeout
        )
    }
}
