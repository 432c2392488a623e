//! services/tracker/src/pages/add.rs
//!
//! The add-expense page: validate the draft, submit through the
//! coordinator's diagnostics path, surface the outcome.

use chrono::Utc;
use expense_tracker_core::ports::ExpenseGateway;
use expense_tracker_core::validate::{self, ExpenseDraft};
use std::sync::Arc;
use tracing::error;

use crate::coordinator::{CreateOutcome, MutationCoordinator};
use crate::pages::SubmitResult;
use crate::session::SessionStore;

pub struct AddPage {
    coordinator: MutationCoordinator,
}

impl AddPage {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self {
            coordinator: MutationCoordinator::new(gateway),
        }
    }

    /// A fresh form starts with today's date, calendar-day granularity.
    pub fn default_draft() -> ExpenseDraft {
        ExpenseDraft {
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// Validation short-circuits before the token check and before any
    /// network call.
    pub async fn submit(&self, session: &SessionStore, draft: &ExpenseDraft) -> SubmitResult {
        let payload = match validate::validate_create(draft, session.user()) {
            Ok(payload) => payload,
            Err(message) => return SubmitResult::Notice(message),
        };
        let token = match session.require_token() {
            Ok(token) => token,
            Err(_) => {
                return SubmitResult::Notice(
                    "You are not authenticated. Please login again.".to_string(),
                )
            }
        };
        match self.coordinator.create(&payload, token).await {
            Ok(CreateOutcome::Created { navigate }) => SubmitResult::Saved { navigate },
            Ok(CreateOutcome::Rejected { message }) => SubmitResult::Notice(message),
            Err(err) => {
                error!("unexpected create error: {err}");
                SubmitResult::Notice(err.to_string())
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

    fn valid_draft() -> ExpenseDraft {
        ExpenseDraft {
            description: "Lunch".to_string(),
            amount: "9.50".to_string(),
            category: Some(Category::Food),
            date: "2024-01-01".to_string(),
        }
    }

    #[tokio::test]
    async fn an_empty_description_never_reaches_the_network() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        let page = AddPage::new(gateway.clone());
        let session = logged_in_session().await;

        let draft = ExpenseDraft {
            description: String::new(),
            ..valid_draft()
        };
        let result = page.submit(&session, &draft).await;
        assert_eq!(result, SubmitResult::Notice("Description is required.".to_string()));
        assert_eq!(gateway.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn a_valid_draft_saves_and_navigates_home() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        let page = AddPage::new(gateway.clone());
        let session = logged_in_session().await;

        let result = page.submit(&session, &valid_draft()).await;
        assert_eq!(result, SubmitResult::Saved { navigate: Route::Dashboard });
        assert_eq!(gateway.calls_named("create_raw"), 1);
    }

    #[tokio::test]
    async fn default_draft_has_a_date_and_nothing_else() {
        let draft = AddPage::default_draft();
        assert!(draft.description.is_empty());
        assert!(draft.amount.is_empty());
        assert!(draft.category.is_none());
        assert_eq!(draft.date.len(), "2024-01-01".len());
    }
}
