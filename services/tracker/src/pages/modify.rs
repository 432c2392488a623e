//! services/tracker/src/pages/modify.rs
//!
//! The modify-expense page: locate the record in the fetched list,
//! project it into the edit buffer, and submit the edited draft.

use expense_tracker_core::ports::ExpenseGateway;
use expense_tracker_core::validate::{self, ExpenseDraft};
use expense_tracker_core::view::{self, EditBuffer};
use std::sync::Arc;
use tracing::error;

use crate::coordinator::{MutationCoordinator, UpdateOutcome};
use crate::pages::SubmitResult;
use crate::session::SessionStore;

/// What loading the edit form produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Ready(EditBuffer),
    /// Both lookup strategies missed.
    NotFound,
    Notice(String),
}

pub struct ModifyPage {
    gateway: Arc<dyn ExpenseGateway>,
    coordinator: MutationCoordinator,
}

impl ModifyPage {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self {
            coordinator: MutationCoordinator::new(gateway.clone()),
            gateway,
        }
    }

    /// Fetches the list and projects the one record into the form.
    pub async fn load(&self, session: &SessionStore, id: &str) -> EditorState {
        let token = match session.require_token() {
            Ok(token) => token,
            Err(err) => return EditorState::Notice(err.to_string()),
        };
        let body = match self.gateway.list(token).await {
            Ok(Some(body)) => body,
            Ok(None) => return EditorState::Notice("Failed to load expense data.".to_string()),
            Err(err) => {
                error!("error fetching the expense: {err}");
                return EditorState::Notice(
                    "An error occurred while fetching the expense. Please try again.".to_string(),
                );
            }
        };
        match view::find_expense(&body, id) {
            Some(record) => EditorState::Ready(EditBuffer::from_value(record)),
            None => EditorState::NotFound,
        }
    }

    pub async fn submit(&self, session: &SessionStore, id: &str, draft: &ExpenseDraft) -> SubmitResult {
        let payload = match validate::validate_update(draft) {
            Ok(payload) => payload,
            Err(message) => return SubmitResult::Notice(message),
        };
        let token = match session.require_token() {
            Ok(token) => token,
            Err(err) => return SubmitResult::Notice(err.to_string()),
        };
        match self.coordinator.update(id, &payload, token).await {
            Ok(UpdateOutcome::Updated { navigate }) => SubmitResult::Saved { navigate },
            Ok(UpdateOutcome::Rejected { message }) => SubmitResult::Notice(message),
            Err(err) => {
                error!("update expense error: {err}");
                SubmitResult::Notice("An error occurred. Please try again.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Route;
    use crate::testutil::{FakeExpenseGateway, MemoryStorage};
    use expense_tracker_core::domain::{Category, User};
    use expense_tracker_core::ports::{GatewayError, Headers};
    use serde_json::json;

    async fn logged_in_session() -> SessionStore {
        let mut session = SessionStore::new(Arc::new(MemoryStorage::default()));
        session
            .login(
                "tok".to_string(),
                User { id: Some("1".to_string()), name: None, email: None },
            )
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn load_projects_the_matching_record() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_list(Ok(Some(json!([
            { "id": 7, "description": "Dentist", "amount": 120.5, "category": "Healthcare",
              "date": "2024-03-01T10:30:00" },
        ]))));
        let page = ModifyPage::new(gateway);
        let session = logged_in_session().await;

        match page.load(&session, "7").await {
            EditorState::Ready(buffer) => {
                assert_eq!(buffer.description, "Dentist");
                assert_eq!(buffer.amount, "120.5");
                assert_eq!(buffer.date, "2024-03-01");
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_reports_a_missing_record() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_list(Ok(Some(json!([{ "id": 1 }]))));
        let page = ModifyPage::new(gateway);
        let session = logged_in_session().await;

        assert_eq!(page.load(&session, "99").await, EditorState::NotFound);
    }

    #[tokio::test]
    async fn submit_navigates_on_the_lenient_success() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_update(Ok(Some(json!({}))));
        let page = ModifyPage::new(gateway);
        let session = logged_in_session().await;

        let draft = ExpenseDraft {
            description: "Dentist".to_string(),
            amount: "120.5".to_string(),
            category: Some(Category::Healthcare),
            date: "2024-03-01".to_string(),
        };
        let result = page.submit(&session, "7", &draft).await;
        assert_eq!(result, SubmitResult::Saved { navigate: Route::ViewExpenses });
    }

    #[tokio::test]
    async fn submit_catches_server_errors_at_the_page_boundary() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_update(Err(GatewayError::Server {
            message: "stale".to_string(),
            status: 409,
            body: None,
            raw: None,
            headers: Headers::new(),
        }));
        let page = ModifyPage::new(gateway);
        let session = logged_in_session().await;

        let draft = ExpenseDraft {
            description: "Dentist".to_string(),
            amount: "0".to_string(),
            category: Some(Category::Healthcare),
            date: "2024-03-01".to_string(),
        };
        let result = page.submit(&session, "7", &draft).await;
        assert_eq!(
            result,
            SubmitResult::Notice("An error occurred. Please try again.".to_string())
        );
    }
}
