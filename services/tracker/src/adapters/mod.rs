//! services/tracker/src/adapters/mod.rs
//!
//! Concrete implementations of the core crate's ports: the HTTP gateways
//! over `reqwest` and the file-backed session storage.

pub mod auth;
pub mod expenses;
pub mod http;
pub mod storage;

pub use auth::HttpAuthGateway;
pub use expenses::HttpExpenseGateway;
pub use storage::FileStorage;
