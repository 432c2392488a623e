//! services/tracker/src/testutil.rs
//!
//! In-memory fakes for the core ports, shared by the unit tests.

use async_trait::async_trait;
use expense_tracker_core::domain::{Credentials, ExpensePayload, Registration};
use expense_tracker_core::ports::{
    AuthGateway, ExpenseGateway, GatewayError, GatewayResponse, GatewayResult, Headers,
    SessionStorage, StorageResult,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// `SessionStorage` over a plain map.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Scripted expense gateway: every operation returns its configured
/// result (success by default) and records the call by name.
#[derive(Default)]
pub struct FakeExpenseGateway {
    list_result: Mutex<Option<GatewayResult<Option<Value>>>>,
    create_raw_result: Mutex<Option<GatewayResult<GatewayResponse>>>,
    update_result: Mutex<Option<GatewayResult<Option<Value>>>>,
    delete_result: Mutex<Option<GatewayResult<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeExpenseGateway {
    pub fn set_list(&self, result: GatewayResult<Option<Value>>) {
        *self.list_result.lock().unwrap() = Some(result);
    }

    pub fn set_create_raw(&self, result: GatewayResult<GatewayResponse>) {
        *self.create_raw_result.lock().unwrap() = Some(result);
    }

    pub fn set_update(&self, result: GatewayResult<Option<Value>>) {
        *self.update_result.lock().unwrap() = Some(result);
    }

    pub fn fail_delete(&self, err: GatewayError) {
        *self.delete_result.lock().unwrap() = Some(Err(err));
    }

    pub fn calls_named(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl ExpenseGateway for FakeExpenseGateway {
    async fn list(&self, _token: &str) -> GatewayResult<Option<Value>> {
        self.record("list");
        self.list_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(Some(json!([]))))
    }

    async fn get(&self, _id: &str, _token: &str) -> GatewayResult<Option<Value>> {
        self.record("get");
        Ok(None)
    }

    async fn create(&self, _payload: &ExpensePayload, _token: &str) -> GatewayResult<Option<Value>> {
        self.record("create");
        Ok(None)
    }

    async fn create_raw(
        &self,
        _payload: &ExpensePayload,
        _token: &str,
    ) -> GatewayResult<GatewayResponse> {
        self.record("create_raw");
        self.create_raw_result.lock().unwrap().clone().unwrap_or(Ok(GatewayResponse {
            succeeded: true,
            status: 201,
            body: Some(json!({ "id": 1 })),
            raw: None,
            headers: Headers::new(),
        }))
    }

    async fn update(
        &self,
        _id: &str,
        _payload: &ExpensePayload,
        _token: &str,
    ) -> GatewayResult<Option<Value>> {
        self.record("update");
        self.update_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(Some(json!({ "success": true }))))
    }

    async fn delete(&self, _id: &str, _token: &str) -> GatewayResult<()> {
        self.record("delete");
        self.delete_result.lock().unwrap().clone().unwrap_or(Ok(()))
    }
}

/// Scripted auth gateway.
#[derive(Default)]
pub struct FakeAuthGateway {
    login_result: Mutex<Option<GatewayResult<GatewayResponse>>>,
    register_result: Mutex<Option<GatewayResult<GatewayResponse>>>,
}

impl FakeAuthGateway {
    pub fn set_login(&self, result: GatewayResult<GatewayResponse>) {
        *self.login_result.lock().unwrap() = Some(result);
    }

    pub fn set_register(&self, result: GatewayResult<GatewayResponse>) {
        *self.register_result.lock().unwrap() = Some(result);
    }
}

#[async_trait]
impl AuthGateway for FakeAuthGateway {
    async fn login(&self, _credentials: &Credentials) -> GatewayResult<GatewayResponse> {
        self.login_result.lock().unwrap().clone().unwrap_or(Ok(GatewayResponse {
            succeeded: true,
            status: 200,
            body: Some(json!({ "token": "tok", "user": { "id": 1, "email": "a@b.c" } })),
            raw: None,
            headers: Headers::new(),
        }))
    }

    async fn register(&self, _registration: &Registration) -> GatewayResult<GatewayResponse> {
        self.register_result.lock().unwrap().clone().unwrap_or(Ok(GatewayResponse {
            succeeded: true,
            status: 201,
            body: Some(json!({ "token": "tok" })),
            raw: None,
            headers: Headers::new(),
        }))
    }
}
