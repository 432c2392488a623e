//! services/tracker/src/adapters/expenses.rs
//!
//! The HTTP adapter for the expense CRUD endpoints. It implements the
//! `ExpenseGateway` port from the core crate. Read, plain-create and
//! update follow the throwing policy; `create_raw` hands the normalized
//! response back untouched; delete short-circuits on HTTP success
//! without reading a body.

use async_trait::async_trait;
use expense_tracker_core::domain::ExpensePayload;
use expense_tracker_core::ports::{
    ExpenseGateway, GatewayError, GatewayResponse, GatewayResult,
};
use reqwest::header::ACCEPT;
use serde_json::Value;

use super::http;

/// A stateless wrapper over the remote expense endpoints.
#[derive(Clone)]
pub struct HttpExpenseGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExpenseGateway {
    /// Creates a new `HttpExpenseGateway`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/expenses", self.base_url)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/api/expenses/{}", self.base_url, id)
    }
}

/// A missing identifier fails locally, without a network round trip.
fn require_id(id: &str) -> GatewayResult<()> {
    if id.trim().is_empty() {
        return Err(GatewayError::Validation("Expense id is required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ExpenseGateway for HttpExpenseGateway {
    async fn list(&self, token: &str) -> GatewayResult<Option<Value>> {
        let response = self
            .client
            .get(self.collection_url())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(http::transport_error)?;
        http::require_success(http::read_response(response).await)
    }

    async fn get(&self, id: &str, token: &str) -> GatewayResult<Option<Value>> {
        require_id(id)?;
        let response = self
            .client
            .get(self.record_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(http::transport_error)?;
        http::require_success(http::read_response(response).await)
    }

    async fn create(&self, payload: &ExpensePayload, token: &str) -> GatewayResult<Option<Value>> {
        let response = self
            .client
            .post(self.collection_url())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(http::transport_error)?;
        http::require_success(http::read_response(response).await)
    }

    async fn create_raw(
        &self,
        payload: &ExpensePayload,
        token: &str,
    ) -> GatewayResult<GatewayResponse> {
        let response = self
            .client
            .post(self.collection_url())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(http::transport_error)?;
        Ok(http::read_response(response).await)
    }

    async fn update(
        &self,
        id: &str,
        payload: &ExpensePayload,
        token: &str,
    ) -> GatewayResult<Option<Value>> {
        require_id(id)?;
        let response = self
            .client
            .put(self.record_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(http::transport_error)?;
        http::require_success(http::read_response(response).await)
    }

    async fn delete(&self, id: &str, token: &str) -> GatewayResult<()> {
        require_id(id)?;
        let response = self
            .client
            .delete(self.record_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(http::transport_error)?;
        // HTTP success is the whole contract here; the body is not read.
        if response.status().is_success() {
            return Ok(());
        }
        Err(http::server_error(http::read_response(response).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ids_fail_before_any_request() {
        match require_id("") {
            Err(GatewayError::Validation(message)) => {
                assert_eq!(message, "Expense id is required");
            }
            other => panic!("expected a Validation error, got {:?}", other),
        }
        assert!(require_id("  ").is_err());
        assert!(require_id("42").is_ok());
    }
}
