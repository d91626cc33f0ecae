//! Defines the route handler for the page that shows a user's budgets and
//! how much has been spent against each of them.
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
    auth::UserID,
    budget::{BudgetPeriod, DEFAULT_BUDGET_COLOR, get_budgets},
    currency::Currency,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, currency_input_styles,
        loading_spinner, progress_bar,
    },
    navigation::NavBar,
    stats::{BudgetStatistics, compute_budget_statistics},
    transaction::get_transactions,
};

/// The colours a user can pick for a budget, as (CSS class, label) pairs.
const BUDGET_COLORS: [(&str, &str); 8] = [
    (DEFAULT_BUDGET_COLOR, "Blue"),
    ("bg-emerald-500", "Green"),
    ("bg-orange-500", "Orange"),
    ("bg-pink-500", "Pink"),
    ("bg-purple-500", "Purple"),
    ("bg-cyan-500", "Cyan"),
    ("bg-yellow-500", "Yellow"),
    ("bg-gray-500", "Gray"),
];

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    /// The database connection for reading budgets and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The currency amounts are displayed in.
    pub currency: Currency,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            currency: state.currency,
        }
    }
}

/// Render the current user's budgets with their spending and a form for adding a budget.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let budgets = get_budgets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;
    let transactions = get_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let mut categories = transactions
        .iter()
        .map(|transaction| transaction.category.clone())
        .collect::<Vec<_>>();
    categories.sort();
    categories.dedup();

    let statistics = compute_budget_statistics(&budgets, &transactions);

    Ok(budgets_view(&statistics, &categories, state.currency).into_response())
}

fn create_budget_form(categories: &[String]) -> Markup {
    let spinner = loading_spinner();

    html!(
        form
            hx-post=(endpoints::BUDGETS_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add Budget" }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    list="budget-category-options"
                    placeholder="e.g. food"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="budget-category-options"
                {
                    @for category in categories {
                        option value=(category) {}
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Limit" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Period" }

                select name="period" id="period" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for period in BudgetPeriod::ALL {
                        option
                            value=(period)
                            selected[period == BudgetPeriod::default()]
                        {
                            (period.label())
                        }
                    }
                }
            }

            div
            {
                label for="color" class=(FORM_LABEL_STYLE) { "Colour" }

                select name="color" id="color" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (class, label) in BUDGET_COLORS {
                        option value=(class) { (label) }
                    }
                }
            }

            button
                type="submit"
                id="submit-button"
                tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Add Budget"
            }
        }
    )
}

fn budget_card(statistics: &BudgetStatistics, currency: Currency) -> Markup {
    let budget = &statistics.budget;
    let delete_url = format_endpoint(endpoints::BUDGET_API, budget.id);
    let is_over = statistics.is_over_budget();

    html!(
        li class={(CARD_STYLE) " space-y-3"} data-budget-card="true"
        {
            div class="flex items-center justify-between gap-4"
            {
                div class="flex items-center gap-2"
                {
                    span class={"inline-block w-3 h-3 rounded-full " (budget.color)} {}
                    h3 class="font-semibold" { (budget.category) }
                    span class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (budget.period.label())
                    }
                }

                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete the budget for '" (budget.category) "'?"
                    }
                    hx-target="closest li"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }

            (progress_bar(statistics.percentage, &budget.color, is_over))

            div class="flex justify-between text-sm"
            {
                span
                {
                    (currency.format(statistics.spent)) " of " (currency.format(statistics.total))
                }

                @if is_over {
                    span class="font-semibold text-red-600 dark:text-red-400"
                    {
                        (currency.format(-statistics.remaining)) " over"
                    }
                } @else {
                    span class="text-gray-600 dark:text-gray-300"
                    {
                        (currency.format(statistics.remaining)) " left"
                    }
                }
            }
        }
    )
}

fn budgets_view(statistics: &[BudgetStatistics], categories: &[String], currency: Currency) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Budgets" }

                @if statistics.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No budgets yet. Add one to start tracking your spending by category."
                    }
                } @else {
                    ul class="grid gap-4 md:grid-cols-2"
                    {
                        @for budget_statistics in statistics {
                            (budget_card(budget_statistics, currency))
                        }
                    }
                }

                section class={(CARD_STYLE) " max-w-md"}
                {
                    (create_budget_form(categories))
                }
            }
        }
    );

    base("Budgets", &[currency_input_styles(currency)], &content)
}
