pub mod domain;
pub mod policy;
pub mod ports;
pub mod validate;
pub mod view;

pub use domain::{Category, Credentials, Expense, ExpensePayload, Registration, Session, User};
pub use policy::{AuthOutcome, UpdateVerdict};
pub use ports::{
    AuthGateway, ExpenseGateway, GatewayError, GatewayResponse, GatewayResult, Headers,
    SessionStorage, StorageError, StorageResult,
};
pub use view::{CategoryFilter, DashboardStats, EditBuffer, ProfileView};
