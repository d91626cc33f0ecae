//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for displaying a user's budgets.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route for creating transactions from a form.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for updating or deleting a transaction from a form.
pub const TRANSACTION_API: &str = "/api/transactions/{transaction_id}";
/// The route for creating budgets from a form.
pub const BUDGETS_API: &str = "/api/budgets";
/// The route for deleting a budget.
pub const BUDGET_API: &str = "/api/budgets/{budget_id}";

/// The JSON action for listing and creating transactions.
pub const TRANSACTIONS_ACTION: &str = "/actions/transactions";
/// The JSON action for updating and deleting a transaction.
pub const TRANSACTION_ACTION: &str = "/actions/transactions/{transaction_id}";
/// The JSON action for listing and creating budgets.
pub const BUDGETS_ACTION: &str = "/actions/budgets";
/// The JSON action for deleting a budget.
pub const BUDGET_ACTION: &str = "/actions/budgets/{budget_id}";
/// The JSON action for the income, expense and balance totals.
pub const BALANCE_STATS_ACTION: &str = "/actions/stats/balance";
/// The JSON action for the per-budget spending statistics.
pub const BUDGET_STATS_ACTION: &str = "/actions/stats/budgets";
/// The JSON action for the per-category expense breakdown.
pub const CATEGORY_STATS_ACTION: &str = "/actions/stats/categories";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
