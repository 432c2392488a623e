//! services/tracker/src/pages/mod.rs
//!
//! Page controllers: the stateful half of each page, minus markup and
//! routing. Every gateway error is caught at this boundary and rendered
//! as a notice string; nothing propagates uncaught.

pub mod add;
pub mod auth;
pub mod dashboard;
pub mod list;
pub mod modify;
pub mod profile;

pub use add::AddPage;
pub use auth::AuthPages;
pub use dashboard::{DashboardPage, DashboardView};
pub use list::{ListPage, ListView};
pub use modify::{EditorState, ModifyPage};

/// Navigation targets. Guarding (authenticated pages bounce to `Login`,
/// auth pages bounce to `Dashboard`) is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    ViewExpenses,
}

/// Result of submitting the add or modify form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    Saved { navigate: Route },
    /// Validation or server trouble; the message is the inline notice.
    Notice(String),
}
