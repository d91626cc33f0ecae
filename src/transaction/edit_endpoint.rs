//! Defines the endpoint for updating a transaction from the edit form.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::TransactionId,
    endpoints,
    transaction::{NewTransaction, update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace the fields of a transaction owned by the current user.
///
/// Redirects to the transactions page on success. A transaction that does
/// not exist or belongs to another user is reported as not found.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<NewTransaction>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, user_id, form.into(), &connection) {
        Ok(0) => {
            tracing::warn!(
                "Could not update transaction {transaction_id} for user {user_id}: zero rows affected"
            );
            Error::NotFound.into_alert_response()
        }
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use time::macros::date;

    use crate::{
        test_utils::{get_test_connection, insert_test_user},
        transaction::{NewTransaction, TransactionType, create_transaction, get_transaction},
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn lunch() -> NewTransaction {
        NewTransaction {
            description: "Lunch".to_owned(),
            amount: 15.0,
            date: date!(2025 - 03 - 14),
            category: "food".to_owned(),
            transaction_type: TransactionType::Expense,
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let conn = get_test_connection();
        let user_id = insert_test_user(&conn, "test@example.com");
        let transaction = create_transaction(user_id, lunch(), &conn).unwrap();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let form = NewTransaction {
            description: "Refund".to_owned(),
            amount: 20.0,
            date: date!(2025 - 03 - 15),
            category: "shopping".to_owned(),
            transaction_type: TransactionType::Income,
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(transaction.id),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            "/transactions"
        );
        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(transaction.id, user_id, &connection).unwrap();
        assert_eq!(updated.description, "Refund");
        assert_eq!(updated.amount, 20.0);
        assert_eq!(updated.date, date!(2025 - 03 - 15));
        assert_eq!(updated.category, "shopping");
        assert_eq!(updated.transaction_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn cannot_update_another_users_transaction() {
        let conn = get_test_connection();
        let owner = insert_test_user(&conn, "owner@example.com");
        let intruder = insert_test_user(&conn, "intruder@example.com");
        let transaction = create_transaction(owner, lunch(), &conn).unwrap();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let form = NewTransaction {
            amount: 999.0,
            ..lunch()
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(intruder),
            Path(transaction.id),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let connection = state.db_connection.lock().unwrap();
        let unchanged = get_transaction(transaction.id, owner, &connection).unwrap();
        assert_eq!(unchanged.amount, 15.0);
    }

    #[tokio::test]
    async fn rejects_invalid_amount() {
        let conn = get_test_connection();
        let user_id = insert_test_user(&conn, "test@example.com");
        let transaction = create_transaction(user_id, lunch(), &conn).unwrap();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let form = NewTransaction {
            amount: -1.0,
            ..lunch()
        };

        let response = edit_transaction_endpoint(
            State(state),
            Extension(user_id),
            Path(transaction.id),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
