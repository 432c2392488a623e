//! services/tracker/src/adapters/auth.rs
//!
//! The HTTP adapter for the auth endpoints. It implements the
//! `AuthGateway` port from the core crate. Both operations are
//! non-throwing: the normalized response comes back whatever its status
//! and the caller classifies it with the policies in the core crate.

use async_trait::async_trait;
use expense_tracker_core::domain::{Credentials, Registration};
use expense_tracker_core::ports::{AuthGateway, GatewayResponse, GatewayResult};

use super::http;

/// A stateless wrapper over the remote auth endpoints.
#[derive(Clone)]
pub struct HttpAuthGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthGateway {
    /// Creates a new `HttpAuthGateway`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<GatewayResponse> {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(credentials)
            .send()
            .await
            .map_err(http::transport_error)?;
        Ok(http::read_response(response).await)
    }

    async fn register(&self, registration: &Registration) -> GatewayResult<GatewayResponse> {
        let response = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(registration)
            .send()
            .await
            .map_err(http::transport_error)?;
        Ok(http::read_response(response).await)
    }
}
