//! Defines the endpoint for deleting a budget.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, auth::UserID, budget::delete_budget, database_id::BudgetId,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a budget owned by the current user.
///
/// Transactions in the budget's category are left as they are.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_budget(budget_id, user_id, &connection) {
        Ok(0) => Error::NotFound.into_alert_response(),
        Ok(_) => Alert::Success {
            message: "Budget deleted".to_owned(),
            details: "Transactions in this category have not been changed.".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not delete budget {budget_id}: {error}");
            error.into_alert_response()
        }
    }
}
