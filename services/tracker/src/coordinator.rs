//! services/tracker/src/coordinator.rs
//!
//! Applies create, update and delete against the gateway and reconciles
//! the page's in-memory list, including the optimistic delete with
//! rollback.

use expense_tracker_core::domain::{Expense, ExpensePayload};
use expense_tracker_core::policy::{self, UpdateVerdict};
use expense_tracker_core::ports::{ExpenseGateway, GatewayError, GatewayResult};
use expense_tracker_core::view;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::pages::Route;

/// How long a success notice stays on screen before create navigates
/// away.
const CONFIRMATION_DELAY: Duration = Duration::from_millis(700);

/// Result of submitting the add-expense form through the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Accepted by the server; the confirmation has had time to render.
    Created { navigate: Route },
    /// Rejected; the message is ready for the inline notice.
    Rejected { message: String },
}

/// Result of submitting the modify-expense form through the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated { navigate: Route },
    Rejected { message: String },
}

/// Result of an optimistic delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    /// The server said no; the list has been restored from the snapshot.
    RolledBack { message: String },
    /// The request itself failed; the list was restored and then
    /// refetched, because local state can no longer be trusted.
    Resynced { message: String },
}

/// Write-through coordinator between the pages and the expense gateway.
pub struct MutationCoordinator {
    gateway: Arc<dyn ExpenseGateway>,
}

impl MutationCoordinator {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self { gateway }
    }

    /// Sends a validated create through the diagnostics path and applies
    /// the relaxed acceptance rule. On acceptance, waits briefly so a
    /// confirmation can render before navigation.
    pub async fn create(&self, payload: &ExpensePayload, token: &str) -> GatewayResult<CreateOutcome> {
        let response = self.gateway.create_raw(payload, token).await?;
        if policy::raw_create_accepted(&response) {
            info!("expense created, returning to the dashboard");
            tokio::time::sleep(CONFIRMATION_DELAY).await;
            return Ok(CreateOutcome::Created {
                navigate: Route::Dashboard,
            });
        }
        error!(status = response.status, "create rejected by the server");
        Ok(CreateOutcome::Rejected {
            message: policy::error_message(response.body.as_ref(), response.status),
        })
    }

    /// Sends a validated update and classifies the body with the lenient
    /// update policy.
    pub async fn update(
        &self,
        id: &str,
        payload: &ExpensePayload,
        token: &str,
    ) -> GatewayResult<UpdateOutcome> {
        let body = self.gateway.update(id, payload, token).await?;
        match policy::judge_update_body(body.as_ref()) {
            UpdateVerdict::Accepted => Ok(UpdateOutcome::Updated {
                navigate: Route::ViewExpenses,
            }),
            UpdateVerdict::Rejected(message) => Ok(UpdateOutcome::Rejected { message }),
        }
    }

    /// Optimistic delete: the record leaves the list before the network
    /// call. A server-reported failure restores the snapshot; any other
    /// failure restores it and refetches the authoritative list.
    pub async fn delete(&self, expenses: &mut Vec<Expense>, id: &str, token: &str) -> DeleteOutcome {
        // Restored by value on failure, never re-derived.
        let snapshot = expenses.clone();
        expenses.retain(|expense| expense.id != id);

        match self.gateway.delete(id, token).await {
            Ok(()) => DeleteOutcome::Deleted,
            Err(GatewayError::Server { message, .. }) => {
                *expenses = snapshot;
                DeleteOutcome::RolledBack { message }
            }
            Err(err) => {
                error!("error deleting expense: {err}");
                *expenses = snapshot;
                match self.refetch(token).await {
                    Ok(fresh) => *expenses = fresh,
                    Err(refetch_err) => {
                        error!("resync after a failed delete also failed: {refetch_err}")
                    }
                }
                DeleteOutcome::Resynced {
                    message: "An error occurred while deleting the expense.".to_string(),
                }
            }
        }
    }

    /// Fetches and decodes the authoritative list.
    pub async fn refetch(&self, token: &str) -> GatewayResult<Vec<Expense>> {
        let body = self.gateway.list(token).await?;
        Ok(body
            .as_ref()
            .map(view::decode_expense_list)
            .unwrap_or_default())
    }
}
