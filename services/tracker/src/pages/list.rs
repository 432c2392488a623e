//! services/tracker/src/pages/list.rs
//!
//! The expense list page: fetch-on-load, pure refiltering on every
//! parameter change, and the optimistic delete.

use expense_tracker_core::domain::Expense;
use expense_tracker_core::ports::ExpenseGateway;
use expense_tracker_core::view::{self, CategoryFilter};
use std::sync::Arc;
use tracing::error;

use crate::coordinator::{DeleteOutcome, MutationCoordinator};
use crate::session::SessionStore;

/// The list page's state: the authoritative fetched list plus the filter
/// parameters. The visible rows are always derived, never stored.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub expenses: Vec<Expense>,
    pub filter: CategoryFilter,
    pub search: String,
    pub error: Option<String>,
}

impl ListView {
    /// The visible rows, rebuilt from the authoritative list on every
    /// call.
    pub fn visible(&self) -> Vec<Expense> {
        view::filter_expenses(&self.expenses, self.filter, &self.search)
    }
}

pub struct ListPage {
    gateway: Arc<dyn ExpenseGateway>,
    coordinator: MutationCoordinator,
}

impl ListPage {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self {
            coordinator: MutationCoordinator::new(gateway.clone()),
            gateway,
        }
    }

    /// Fetch-on-load; the body may be a plain array or a `result`
    /// wrapper.
    pub async fn load(&self, session: &SessionStore) -> ListView {
        let token = match session.require_token() {
            Ok(token) => token,
            Err(err) => {
                return ListView {
                    error: Some(err.to_string()),
                    ..Default::default()
                }
            }
        };
        match self.gateway.list(token).await {
            Ok(Some(body)) => ListView {
                expenses: view::decode_expense_list(&body),
                ..Default::default()
            },
            Ok(None) => ListView {
                error: Some("Failed to load expenses.".to_string()),
                ..Default::default()
            },
            Err(err) => {
                error!("error fetching expenses: {err}");
                ListView {
                    error: Some(err.to_string()),
                    ..Default::default()
                }
            }
        }
    }

    /// Optimistic delete against the current view's list.
    pub async fn delete(&self, view: &mut ListView, id: &str, session: &SessionStore) -> DeleteOutcome {
        match session.require_token() {
            Ok(token) => self.coordinator.delete(&mut view.expenses, id, token).await,
            // Nothing was touched; the message doubles as the notice.
            Err(err) => DeleteOutcome::RolledBack {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeExpenseGateway, MemoryStorage};
    use expense_tracker_core::domain::{Category, User};
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
    async fn load_accepts_the_result_wrapper() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_list(Ok(Some(json!({ "result": [{ "id": 1, "category": "Food" }] }))));
        let page = ListPage::new(gateway);
        let session = logged_in_session().await;

        let view = page.load(&session).await;
        assert_eq!(view.error, None);
        assert_eq!(view.expenses.len(), 1);
        assert_eq!(view.expenses[0].category, Category::Food);
    }

    #[tokio::test]
    async fn visible_rows_are_recomputed_per_call() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_list(Ok(Some(json!([
            { "id": 1, "description": "Groceries", "category": "Food", "date": "2024-01-01" },
            { "id": 2, "description": "Taxi", "category": "Transportation", "date": "2024-02-01" },
        ]))));
        let page = ListPage::new(gateway);
        let session = logged_in_session().await;

        let mut view = page.load(&session).await;
        assert_eq!(view.visible().len(), 2);

        view.filter = CategoryFilter::Only(Category::Food);
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");
        // The authoritative list is untouched by filtering.
        assert_eq!(view.expenses.len(), 2);
    }

    #[tokio::test]
    async fn delete_without_a_session_leaves_the_list_alone() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        let page = ListPage::new(gateway.clone());
        let session = SessionStore::new(Arc::new(MemoryStorage::default()));

        let mut view = ListView {
            expenses: vec![Expense {
                id: "1".to_string(),
                description: "keep me".to_string(),
                amount: 1.0,
                category: Category::Other,
                date: "2024-01-01".to_string(),
                owner_id: None,
            }],
            ..Default::default()
        };
        let outcome = page.delete(&mut view, "1", &session).await;
        assert!(matches!(outcome, DeleteOutcome::RolledBack { .. }));
        assert_eq!(view.expenses.len(), 1);
        assert_eq!(gateway.total_calls(), 0);
    }
}
