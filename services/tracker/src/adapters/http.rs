//! services/tracker/src/adapters/http.rs
//!
//! The one normalization rule shared by every gateway: read the response
//! as text, optimistically parse it as JSON (falling back to the raw text
//! as a string value, then to no body at all), and wrap the result with
//! the status and headers.

use expense_tracker_core::ports::{GatewayError, GatewayResponse, GatewayResult, Headers};
use expense_tracker_core::policy;
use serde_json::Value;

/// Builds a normalized response from the pieces of an HTTP response.
/// Pure, so the parsing rules are testable without a live socket.
pub fn normalize(status: u16, headers: Headers, raw: Option<String>) -> GatewayResponse {
    let body = raw
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(|text| {
            serde_json::from_str::<Value>(text).unwrap_or_else(|_| Value::String(text.to_string()))
        });
    GatewayResponse {
        succeeded: (200..300).contains(&status),
        status,
        body,
        raw,
        headers,
    }
}

/// Drains a `reqwest` response into the normalized shape. A body that
/// cannot be read counts as no body; headers that are not valid text are
/// skipped rather than failing the whole response.
pub async fn read_response(response: reqwest::Response) -> GatewayResponse {
    let status = response.status().as_u16();
    let mut headers = Headers::new();
    for (name, value) in response.headers() {
        if let Ok(text) = value.to_str() {
            headers.insert(name.as_str().to_string(), text.to_string());
        }
    }
    let raw = response.text().await.ok();
    normalize(status, headers, raw)
}

/// The throwing policy: a success yields the parsed body, anything else
/// becomes a structured `Server` error.
pub fn require_success(response: GatewayResponse) -> GatewayResult<Option<Value>> {
    if response.succeeded {
        return Ok(response.body);
    }
    Err(server_error(response))
}

/// Wraps a failed response as a `Server` error. The message follows the
/// shared extraction precedence; status, body, raw text and headers ride
/// along so no caller ever has to re-parse the response.
pub fn server_error(response: GatewayResponse) -> GatewayError {
    GatewayError::Server {
        message: policy::error_message(response.body.as_ref(), response.status),
        status: response.status,
        body: response.body,
        raw: response.raw,
        headers: response.headers,
    }
}

/// A request that never produced an HTTP response.
pub fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}
