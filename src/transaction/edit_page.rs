//! Defines the route handler for the page for editing a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::get_budgets,
    currency::Currency,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, currency_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
    transaction::{Transaction, get_transaction, get_transactions},
};

use super::form::{TransactionFormDefaults, known_categories, transaction_form_fields};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The currency amounts are displayed in.
    pub currency: Currency,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            currency: state.currency,
        }
    }
}

/// Render a form prefilled with a transaction owned by the current user.
///
/// Responds with the 404 page if the transaction does not exist or belongs
/// to another user.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user_id, &connection)
        .inspect_err(|error| tracing::debug!("could not get transaction {transaction_id}: {error}"))?;
    let transactions = get_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let budgets = get_budgets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;
    let categories = known_categories(&transactions, &budgets);

    Ok(edit_transaction_view(&transaction, &categories, state.currency).into_response())
}

fn edit_transaction_view(
    transaction: &Transaction,
    categories: &[String],
    currency: Currency,
) -> Markup {
    let edit_endpoint = format_endpoint(endpoints::TRANSACTION_API, transaction.id);
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = transaction_form_fields(
        &TransactionFormDefaults {
            transaction_type: transaction.transaction_type,
            amount: Some(transaction.amount),
            date: transaction.date,
            description: Some(transaction.description.as_str()),
            category: Some(transaction.category.as_str()),
            autofocus_amount: true,
        },
        categories,
    );

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(edit_endpoint)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button
                    type="submit"
                    id="submit-button"
                    tabindex="0"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Save Changes"
                }

                p class="text-sm"
                {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Cancel" }
                }
            }
        }
    );

    base("Edit Transaction", &[currency_input_styles(currency)], &content)
}
