//! services/tracker/src/error.rs
//!
//! Defines the primary error type for the entire client service.

use crate::config::ConfigError;
use expense_tracker_core::ports::{GatewayError, StorageError};

/// The primary error type for the `tracker` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from a gateway port.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Represents a failure of the durable session storage.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Represents a serialization failure.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
