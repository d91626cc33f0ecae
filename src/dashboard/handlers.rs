//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    budget::{Budget, get_budgets},
    currency::Currency,
    dashboard::cards::{
        balance_cards, budget_progress_section, category_breakdown_section,
        recent_transactions_section,
    },
    endpoints,
    html::{base, link},
    navigation::NavBar,
    stats::{compute_budget_statistics, compute_category_breakdown, summarize_balance},
    transaction::{Transaction, get_transactions},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The currency amounts are displayed in.
    pub currency: Currency,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            currency: state.currency,
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let transactions = get_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let budgets = get_budgets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() && budgets.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, user.email.as_str()).into_response());
    }

    let format_money = |amount: f64| state.currency.format_rounded(amount);

    Ok(dashboard_view(
        nav_bar,
        user.email.as_str(),
        &transactions,
        &budgets,
        state.currency,
        &format_money,
    )
    .into_response())
}

/// Renders the dashboard page when the user has not recorded anything yet.
fn dashboard_no_data_view(nav_bar: NavBar, email: &str) -> Markup {
    let nav_bar = nav_bar.into_html();
    let transactions_link = link(endpoints::TRANSACTIONS_VIEW, "add a transaction");
    let budgets_link = link(endpoints::BUDGETS_VIEW, "create a budget");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { "Signed in as " (email) }

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your spending summary will show up here once you "
                (transactions_link) " or " (budgets_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page.
///
/// `transactions` should be sorted most recent first.
fn dashboard_view(
    nav_bar: NavBar<'_>,
    email: &str,
    transactions: &[Transaction],
    budgets: &[Budget],
    currency: Currency,
    format_money: &impl Fn(f64) -> String,
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let summary = summarize_balance(transactions);
    let budget_statistics = compute_budget_statistics(budgets, transactions);
    let categories = compute_category_breakdown(transactions, budgets);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-4 px-2 py-4 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full"
            {
                h1 class="text-2xl font-bold" { "Dashboard" }
                p class="text-sm text-gray-500 dark:text-gray-400" { "Signed in as " (email) }
            }

            (balance_cards(&summary, transactions.len(), format_money))

            div class="w-full grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                (budget_progress_section(&budget_statistics, format_money))
                (category_breakdown_section(&categories, format_money))
            }

            div class="w-full"
            {
                (recent_transactions_section(transactions, currency))
            }
        }
    );

    base("Dashboard", &[], &content)
}
