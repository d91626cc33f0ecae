//! JSON route handlers that expose the actions over HTTP.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState,
    actions::{self, ActionResult},
    auth::UserID,
    budget::NewBudget,
    database_id::{BudgetId, TransactionId},
    transaction::{NewTransaction, TransactionUpdate},
};

/// The state needed to run an action.
#[derive(Debug, Clone)]
pub struct ActionState {
    /// The database connection for reading and writing records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ActionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Lock the database, run `action` and serialize its result as JSON.
fn run_action<T: Serialize>(
    state: &ActionState,
    failure_message: &str,
    action: impl FnOnce(&Connection) -> ActionResult<T>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => action(&connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            ActionResult::Failure(failure_message.to_owned())
        }
    };

    Json(result).into_response()
}

/// Unwrap a JSON body, or describe why it was rejected as a failed action.
///
/// The status code of the rejection is kept so clients can tell a malformed
/// request apart from a failed action.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::warn!("rejected action body: {}", rejection.body_text());
        let result = ActionResult::<()>::Failure(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ));

        (rejection.status(), Json(result)).into_response()
    })
}

fn caller(user_id: Option<Extension<UserID>>) -> Option<UserID> {
    user_id.map(|Extension(user_id)| user_id)
}

/// List the caller's transactions.
pub async fn get_transactions_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
) -> Response {
    run_action(&state, "Failed to fetch transactions", |connection| {
        actions::get_transactions(caller(user_id), connection)
    })
}

/// Create a transaction from a JSON body.
pub async fn add_transaction_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let new_transaction = match parse_body(body) {
        Ok(new_transaction) => new_transaction,
        Err(response) => return response,
    };

    run_action(&state, "Failed to add transaction", |connection| {
        actions::add_transaction(caller(user_id), new_transaction, connection)
    })
}

/// Apply a partial update from a JSON body to a transaction.
pub async fn edit_transaction_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
    Path(transaction_id): Path<TransactionId>,
    body: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Response {
    let update = match parse_body(body) {
        Ok(update) => update,
        Err(response) => return response,
    };

    run_action(&state, "Failed to update transaction", |connection| {
        actions::edit_transaction(caller(user_id), transaction_id, update, connection)
    })
}

/// Delete a transaction.
pub async fn delete_transaction_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    run_action(&state, "Failed to delete transaction", |connection| {
        actions::delete_transaction(caller(user_id), transaction_id, connection)
    })
}

/// List the caller's budgets.
pub async fn get_budgets_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
) -> Response {
    run_action(&state, "Failed to fetch budgets", |connection| {
        actions::get_budgets(caller(user_id), connection)
    })
}

/// Create a budget from a JSON body.
pub async fn add_budget_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
    body: Result<Json<NewBudget>, JsonRejection>,
) -> Response {
    let new_budget = match parse_body(body) {
        Ok(new_budget) => new_budget,
        Err(response) => return response,
    };

    run_action(&state, "Failed to add budget", |connection| {
        actions::add_budget(caller(user_id), new_budget, connection)
    })
}

/// Delete a budget.
pub async fn delete_budget_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    run_action(&state, "Failed to delete budget", |connection| {
        actions::delete_budget(caller(user_id), budget_id, connection)
    })
}

/// The caller's income, expense and balance totals.
pub async fn get_balance_stats_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
) -> Response {
    run_action(&state, "Failed to calculate balance", |connection| {
        actions::get_balance_stats(caller(user_id), connection)
    })
}

/// The caller's spending against each budget.
pub async fn get_budget_stats_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
) -> Response {
    run_action(&state, "Failed to fetch budget stats", |connection| {
        actions::get_budget_stats(caller(user_id), connection)
    })
}

/// The caller's expenses grouped by category.
pub async fn get_category_breakdown_action(
    State(state): State<ActionState>,
    user_id: Option<Extension<UserID>>,
) -> Response {
    run_action(&state, "Failed to fetch category breakdown", |connection| {
        actions::get_category_breakdown(caller(user_id), connection)
    })
}
