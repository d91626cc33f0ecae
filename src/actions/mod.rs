//! The operations a client can perform on its own records.
//!
//! Each action resolves the caller, queries the caller's records and returns
//! an [ActionResult]. Errors never escape an action: they are logged and
//! turned into a failure message that is safe to show to the client.

mod routes;

use rusqlite::Connection;
use serde::{Serialize, ser::SerializeStruct};

use crate::{
    Error,
    auth::UserID,
    budget::{self, Budget, NewBudget},
    database_id::{BudgetId, RowsAffected, TransactionId},
    stats::{
        BalanceSummary, BudgetStatistics, CategorySpend, compute_budget_statistics,
        compute_category_breakdown, summarize_balance,
    },
    transaction::{self, NewTransaction, Transaction, TransactionUpdate},
};

pub use routes::{
    add_budget_action, add_transaction_action, delete_budget_action, delete_transaction_action,
    edit_transaction_action, get_balance_stats_action, get_budget_stats_action,
    get_budgets_action, get_category_breakdown_action, get_transactions_action,
};

/// The message returned when the caller is not logged in.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// The outcome of an action.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// The action succeeded and produced `T`.
    Success(T),
    /// The action failed. The message is for display only.
    Failure(String),
}

impl<T> ActionResult<T> {
    /// The result for a caller that is not logged in.
    pub fn unauthorized() -> Self {
        Self::Failure(UNAUTHORIZED_MESSAGE.to_owned())
    }

    /// Whether the action succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert a store result, logging errors and replacing them with `failure_message`.
    ///
    /// Invalid input is reported with its own message so the client can fix it.
    fn from_store(result: Result<T, Error>, failure_message: &str) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error @ (Error::InvalidAmount(_) | Error::EmptyCategory)) => {
                Self::Failure(error.to_string())
            }
            Err(error) => {
                tracing::error!("{failure_message}: {error}");
                Self::Failure(failure_message.to_owned())
            }
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ActionResult", 2)?;

        match self {
            ActionResult::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            ActionResult::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }

        state.end()
    }
}

/// List the caller's transactions, most recent first.
pub fn get_transactions(
    user_id: Option<UserID>,
    connection: &Connection,
) -> ActionResult<Vec<Transaction>> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        transaction::get_transactions(user_id, connection),
        "Failed to fetch transactions",
    )
}

/// Record a new transaction for the caller.
pub fn add_transaction(
    user_id: Option<UserID>,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> ActionResult<Transaction> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        transaction::create_transaction(user_id, new_transaction, connection),
        "Failed to add transaction",
    )
}

/// Update the caller's transaction `id`.
///
/// Succeeds with zero rows affected if the caller does not own a transaction
/// with that ID.
pub fn edit_transaction(
    user_id: Option<UserID>,
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> ActionResult<RowsAffected> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        transaction::update_transaction(id, user_id, update, connection),
        "Failed to update transaction",
    )
}

/// Delete the caller's transaction `id`.
///
/// Succeeds with zero rows affected if the caller does not own a transaction
/// with that ID.
pub fn delete_transaction(
    user_id: Option<UserID>,
    id: TransactionId,
    connection: &Connection,
) -> ActionResult<RowsAffected> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        transaction::delete_transaction(id, user_id, connection),
        "Failed to delete transaction",
    )
}

/// List the caller's budgets.
pub fn get_budgets(user_id: Option<UserID>, connection: &Connection) -> ActionResult<Vec<Budget>> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        budget::get_budgets(user_id, connection),
        "Failed to fetch budgets",
    )
}

/// Create a new budget for the caller.
pub fn add_budget(
    user_id: Option<UserID>,
    new_budget: NewBudget,
    connection: &Connection,
) -> ActionResult<Budget> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        budget::create_budget(user_id, new_budget, connection),
        "Failed to add budget",
    )
}

/// Delete the caller's budget `id`.
pub fn delete_budget(
    user_id: Option<UserID>,
    id: BudgetId,
    connection: &Connection,
) -> ActionResult<RowsAffected> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    ActionResult::from_store(
        budget::delete_budget(id, user_id, connection),
        "Failed to delete budget",
    )
}

/// Total the caller's income and expenses.
pub fn get_balance_stats(
    user_id: Option<UserID>,
    connection: &Connection,
) -> ActionResult<BalanceSummary> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    let result = transaction::get_transactions(user_id, connection)
        .map(|transactions| summarize_balance(&transactions));

    ActionResult::from_store(result, "Failed to calculate balance")
}

/// Calculate how much the caller has spent against each of their budgets.
pub fn get_budget_stats(
    user_id: Option<UserID>,
    connection: &Connection,
) -> ActionResult<Vec<BudgetStatistics>> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    let result = budget::get_budgets(user_id, connection).and_then(|budgets| {
        let transactions = transaction::get_transactions(user_id, connection)?;
        Ok(compute_budget_statistics(&budgets, &transactions))
    });

    ActionResult::from_store(result, "Failed to fetch budget stats")
}

/// Group the caller's expenses by category.
pub fn get_category_breakdown(
    user_id: Option<UserID>,
    connection: &Connection,
) -> ActionResult<Vec<CategorySpend>> {
    let Some(user_id) = user_id else {
        return ActionResult::unauthorized();
    };

    let result = transaction::get_transactions(user_id, connection).and_then(|transactions| {
        let budgets = budget::get_budgets(user_id, connection)?;
        Ok(compute_category_breakdown(&transactions, &budgets))
    });

    ActionResult::from_store(result, "Failed to fetch category breakdown")
}
