//! crates/expense_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing
//! the core to be independent of the concrete HTTP client and of wherever
//! the session record is durably kept.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{Credentials, ExpensePayload, Registration};

/// Response headers, lower-level details already flattened to text.
pub type Headers = BTreeMap<String, String>;

//=========================================================================================
// Gateway Error and Result Types
//=========================================================================================

/// The tagged error for all gateway operations.
///
/// Every variant that describes a server response carries the full
/// normalized response alongside the message, so callers never have to
/// attach fields after the fact.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// A locally detected problem with the request arguments. Nothing was
    /// sent over the network.
    #[error("{0}")]
    Validation(String),

    /// No token is present. Raised locally, never attempted against the
    /// server.
    #[error("Not authenticated. Please login again.")]
    Unauthorized,

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server {
        message: String,
        status: u16,
        body: Option<Value>,
        raw: Option<String>,
        headers: Headers,
    },
}

impl GatewayError {
    /// The HTTP status, when the error came from an actual response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A convenience alias for `Result<T, GatewayError>`.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure to read or write the durable session record.
#[derive(Debug, Clone, thiserror::Error)]
#[error("session storage error: {0}")]
pub struct StorageError(pub String);

pub type StorageResult<T> = Result<T, StorageError>;

//=========================================================================================
// Normalized Response
//=========================================================================================

/// Normalized wrapper around an HTTP response: status, optimistically
/// parsed body, raw text, and headers.
///
/// `body` is the parsed JSON when the text parses, the raw text as a JSON
/// string when it does not, and absent when there was no text at all.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// Whether the HTTP status was in the success range.
    pub succeeded: bool,
    pub status: u16,
    pub body: Option<Value>,
    pub raw: Option<String>,
    pub headers: Headers,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The auth endpoints. Both operations follow the non-throwing policy:
/// the normalized response comes back whatever its status, and the caller
/// classifies it (see `policy`). Only transport failures are errors.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// POST /api/auth/login
    async fn login(&self, credentials: &Credentials) -> GatewayResult<GatewayResponse>;

    /// POST /api/auth/register
    async fn register(&self, registration: &Registration) -> GatewayResult<GatewayResponse>;
}

/// The expense CRUD endpoints.
///
/// The read, plain-create and update operations follow the throwing
/// policy: a non-success status becomes `GatewayError::Server` and a
/// success yields the parsed body. Implementations must reject an empty
/// `id` locally, before any request is issued.
#[async_trait]
pub trait ExpenseGateway: Send + Sync {
    /// GET /api/expenses
    async fn list(&self, token: &str) -> GatewayResult<Option<Value>>;

    /// GET /api/expenses/{id}
    async fn get(&self, id: &str, token: &str) -> GatewayResult<Option<Value>>;

    /// POST /api/expenses
    async fn create(&self, payload: &ExpensePayload, token: &str) -> GatewayResult<Option<Value>>;

    /// POST /api/expenses, diagnostics variant: never fails on a bad
    /// status, only on transport problems. The caller applies the relaxed
    /// acceptance rule.
    async fn create_raw(
        &self,
        payload: &ExpensePayload,
        token: &str,
    ) -> GatewayResult<GatewayResponse>;

    /// PUT /api/expenses/{id}
    async fn update(
        &self,
        id: &str,
        payload: &ExpensePayload,
        token: &str,
    ) -> GatewayResult<Option<Value>>;

    /// DELETE /api/expenses/{id}. An HTTP success returns immediately
    /// without reading a body; anything else follows the throwing policy.
    async fn delete(&self, id: &str, token: &str) -> GatewayResult<()>;
}

/// Durable key-value storage for the session record.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
