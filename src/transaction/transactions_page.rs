//! Defines the route handler for the page that lists a user's transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::get_budgets,
    currency::Currency,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, currency_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{Transaction, TransactionType, get_transactions},
};

use super::form::{TransactionFormDefaults, known_categories, transaction_form_fields};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The currency amounts are displayed in.
    pub currency: Currency,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            currency: state.currency,
        }
    }
}

/// Render the current user's transactions, most recent first, with a form for adding more.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let transactions = get_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let budgets = get_budgets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;
    let categories = known_categories(&transactions, &budgets);

    Ok(transactions_view(&transactions, &categories, today, state.currency).into_response())
}

fn create_transaction_form(categories: &[String], today: Date) -> Markup {
    let spinner = loading_spinner();
    let fields = transaction_form_fields(
        &TransactionFormDefaults {
            transaction_type: TransactionType::Expense,
            amount: None,
            date: today,
            description: None,
            category: None,
            autofocus_amount: false,
        },
        categories,
    );

    html!(
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add Transaction" }

            (fields)

            button
                type="submit"
                id="submit-button"
                tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Add Transaction"
            }
        }
    )
}

fn signed_amount(transaction: &Transaction, currency: Currency) -> Markup {
    match transaction.transaction_type {
        TransactionType::Income => html!(
            span class="text-green-600 dark:text-green-400"
            {
                "+" (currency.format(transaction.amount))
            }
        ),
        TransactionType::Expense => html!(
            span class="text-red-600 dark:text-red-400"
            {
                "-" (currency.format(transaction.amount))
            }
        ),
    }
}

fn transaction_row(transaction: &Transaction, currency: Currency) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION_API, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class={(TABLE_CELL_STYLE) " text-right"} { (signed_amount(transaction, currency)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        hx-delete=(delete_url)
                        hx-confirm={
                            "Are you sure you want to delete '" (transaction.description) "'?"
                        }
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

fn transactions_view(
    transactions: &[Transaction],
    categories: &[String],
    today: Date,
    currency: Currency,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Transactions" }

                section class={(CARD_STYLE) " max-w-md"}
                {
                    (create_transaction_form(categories, today))
                }

                div class="overflow-x-auto rounded-lg shadow dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction, currency))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions yet. Add one with the form above."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[currency_input_styles(currency)], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        auth::UserID,
        budget::{BudgetPeriod, NewBudget, create_budget},
        currency::Currency,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_html_content_type, assert_hx_endpoint, assert_valid_html,
            get_category_suggestions, get_test_connection, insert_test_user,
            must_get_delete_url, must_get_form, parse_html_document,
        },
        transaction::{NewTransaction, TransactionType, create_transaction},
    };

    use super::{TransactionsPageState, get_transactions_page};

    fn new_transaction(
        description: &str,
        amount: f64,
        date: time::Date,
        transaction_type: TransactionType,
    ) -> NewTransaction {
        NewTransaction {
            description: description.to_owned(),
            amount,
            date,
            category: "food".to_owned(),
            transaction_type,
        }
    }

    fn get_state(conn: rusqlite::Connection) -> TransactionsPageState {
        TransactionsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            currency: Currency::Usd,
        }
    }

    async fn render_page(state: TransactionsPageState, user_id: UserID) -> Html {
        let response = get_transactions_page(State(state), Extension(user_id))
            .await
            .expect("could not render transactions page");

        assert_eq!(response.status(), StatusCode::OK);
        assert_html_content_type(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        document
    }

    #[tokio::test]
    async fn lists_only_own_transactions_most_recent_first() {
        let conn = get_test_connection();
        let user_id = insert_test_user(&conn, "test@example.com");
        let other_user = insert_test_user(&conn, "other@example.com");
        let older = create_transaction(
            user_id,
            new_transaction("Groceries", 50.0, date!(2025 - 01 - 01), TransactionType::Expense),
            &conn,
        )
        .unwrap();
        let newer = create_transaction(
            user_id,
            new_transaction("Salary", 1000.0, date!(2025 - 02 - 01), TransactionType::Income),
            &conn,
        )
        .unwrap();
        create_transaction(
            other_user,
            new_transaction("Secret", 1.0, date!(2025 - 03 - 01), TransactionType::Expense),
            &conn,
        )
        .unwrap();

        let document = render_page(get_state(conn), user_id).await;

        let row_selector = Selector::parse("tr[data-transaction-row]").unwrap();
        let rows = document.select(&row_selector).collect::<Vec<_>>();
        assert_eq!(rows.len(), 2, "want 2 rows, got {}", rows.len());

        let delete_urls = rows
            .iter()
            .map(|row| must_get_delete_url(row).to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            delete_urls,
            [
                format_endpoint(endpoints::TRANSACTION_API, newer.id),
                format_endpoint(endpoints::TRANSACTION_API, older.id),
            ]
        );

        let text = rows[0].text().collect::<String>();
        assert!(text.contains("+$1,000.00"), "got row text {text:?}");
        let text = rows[1].text().collect::<String>();
        assert!(text.contains("-$50.00"), "got row text {text:?}");
    }

    #[tokio::test]
    async fn shows_empty_message_without_transactions() {
        let conn = get_test_connection();
        let user_id = insert_test_user(&conn, "test@example.com");

        let document = render_page(get_state(conn), user_id).await;

        let cell_selector = Selector::parse("td[colspan]").unwrap();
        let cell = document
            .select(&cell_selector)
            .next()
            .expect("want empty table message");
        assert!(
            cell.text()
                .collect::<String>()
                .contains("No transactions yet")
        );
    }

    #[tokio::test]
    async fn has_create_form_with_budget_categories() {
        let conn = get_test_connection();
        let user_id = insert_test_user(&conn, "test@example.com");
        create_budget(
            user_id,
            NewBudget {
                category: "rent".to_owned(),
                amount: 1200.0,
                period: BudgetPeriod::Monthly,
                color: "bg-blue-500".to_owned(),
            },
            &conn,
        )
        .unwrap();

        let document = render_page(get_state(conn), user_id).await;

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_eq!(get_category_suggestions(&form), ["rent"]);
    }
}
