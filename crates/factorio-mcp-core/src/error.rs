//! Error types for the Factorio MCP bridge

use std::time::Duration;
use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, FactorioMcpError>;

/// Bridge error types
#[derive(Debug, Error)]
pub enum FactorioMcpError {
    /// RCON client failed to start or exited with failure
    #[error("Failed to execute RCON command: {0}")]
    Execution(String),

    /// RCON client did not finish within the configured wait
    #[error("RCON command timed out after {0:?}")]
    Timeout(Duration),

    /// Tool argument rejected before anything was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// stdio channel error
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FactorioMcpError {
    fn from(err: serde_json::Error) -> Self {
        FactorioMcpError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FactorioMcpError {
    fn from(err: std::io::Error) -> Self {
        FactorioMcpError::Io(err.to_string())
    }
}

/// JSON-RPC error codes
pub mod error_codes {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}
