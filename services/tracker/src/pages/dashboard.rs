//! services/tracker/src/pages/dashboard.rs
//!
//! The dashboard page: one fetch on load, summary stats recomputed from
//! scratch, and the recent-expenses panel.

use expense_tracker_core::domain::Expense;
use expense_tracker_core::ports::ExpenseGateway;
use expense_tracker_core::view::{self, DashboardStats};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::session::SessionStore;

/// How many expenses the recent-activity panel shows.
const RECENT_LIMIT: usize = 6;

/// The dashboard's derived state after a load. On any failure the stats
/// reset to zero and `error` carries the notice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub expenses: Vec<Expense>,
    pub stats: DashboardStats,
    pub error: Option<String>,
}

impl DashboardView {
    fn failed(message: String) -> Self {
        DashboardView {
            error: Some(message),
            ..Default::default()
        }
    }

    /// The recent-expenses panel: the first few records in fetched order.
    pub fn recent(&self) -> &[Expense] {
        &self.expenses[..self.expenses.len().min(RECENT_LIMIT)]
    }
}

pub struct DashboardPage {
    gateway: Arc<dyn ExpenseGateway>,
}

impl DashboardPage {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch-on-load. Only a top-level array counts as a loaded list; a
    /// non-array body surfaces its own `error`/`message` when it has one.
    pub async fn load(&self, session: &SessionStore) -> DashboardView {
        let token = match session.require_token() {
            Ok(token) => token,
            Err(err) => return DashboardView::failed(err.to_string()),
        };
        let body = match self.gateway.list(token).await {
            Ok(body) => body,
            Err(err) => {
                error!("error fetching expenses: {err}");
                return DashboardView::failed(err.to_string());
            }
        };
        let Some(expenses) = body.as_ref().and_then(view::decode_expense_array) else {
            let message = body
                .as_ref()
                .and_then(|b| {
                    b.get("error")
                        .and_then(Value::as_str)
                        .or_else(|| b.get("message").and_then(Value::as_str))
                })
                .map(str::to_string)
                .unwrap_or_else(|| "Failed to load expenses.".to_string());
            return DashboardView::failed(message);
        };
        let stats = DashboardStats::from_expenses(&expenses);
        DashboardView {
            expenses,
            stats,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeExpenseGateway, MemoryStorage};
    use expense_tracker_core::domain::User;
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
    async fn load_computes_stats_from_the_fetched_list() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_list(Ok(Some(json!([
            { "id": 1, "amount": 10, "date": "2024-01-01" },
            { "id": 2, "amount": 20, "date": "2024-01-02" },
        ]))));
        let page = DashboardPage::new(gateway);
        let session = logged_in_session().await;

        let view = page.load(&session).await;
        assert_eq!(view.error, None);
        assert_eq!(view.stats.total, 30.0);
        assert_eq!(view.stats.count, 2);
        assert_eq!(view.stats.average, 15.0);
        assert_eq!(view.recent().len(), 2);
    }

    #[tokio::test]
    async fn non_array_bodies_surface_their_own_message() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        gateway.set_list(Ok(Some(json!({ "message": "subscription expired" }))));
        let page = DashboardPage::new(gateway);
        let session = logged_in_session().await;

        let view = page.load(&session).await;
        assert_eq!(view.error.as_deref(), Some("subscription expired"));
        assert_eq!(view.stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn logged_out_loads_fail_without_a_request() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        let page = DashboardPage::new(gateway.clone());
        let session = SessionStore::new(Arc::new(MemoryStorage::default()));

        let view = page.load(&session).await;
        assert_eq!(view.error.as_deref(), Some("Not authenticated. Please login again."));
        assert_eq!(gateway.total_calls(), 0);
    }

    #[tokio::test]
    async fn recent_is_capped() {
        let gateway = Arc::new(FakeExpenseGateway::default());
        let many: Vec<_> = (0..10).map(|i| json!({ "id": i, "amount": 1 })).collect();
        gateway.set_list(Ok(Some(json!(many))));
        let page = DashboardPage::new(gateway);
        let session = logged_in_session().await;

        let view = page.load(&session).await;
        assert_eq!(view.expenses.len(), 10);
        assert_eq!(view.recent().len(), 6);
    }
}
