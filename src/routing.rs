//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    actions::{
        add_budget_action, add_transaction_action, delete_budget_action,
        delete_transaction_action, edit_transaction_action, get_balance_stats_action,
        get_budget_stats_action, get_budgets_action, get_category_breakdown_action,
        get_transactions_action,
    },
    auth::{
        AuthState, auth_guard, auth_guard_hx, auth_guard_json, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    budget::{create_budget_endpoint, delete_budget_endpoint, get_budgets_page},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_edit_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::BUDGETS_VIEW, get(get_budgets_page))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_guard,
        ));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let hx_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::BUDGETS_API, post(create_budget_endpoint))
        .route(endpoints::BUDGET_API, delete(delete_budget_endpoint))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_guard_hx,
        ));

    let action_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_ACTION,
            get(get_transactions_action).post(add_transaction_action),
        )
        .route(
            endpoints::TRANSACTION_ACTION,
            put(edit_transaction_action).delete(delete_transaction_action),
        )
        .route(
            endpoints::BUDGETS_ACTION,
            get(get_budgets_action).post(add_budget_action),
        )
        .route(endpoints::BUDGET_ACTION, delete(delete_budget_action))
        .route(
            endpoints::BALANCE_STATS_ACTION,
            get(get_balance_stats_action),
        )
        .route(endpoints::BUDGET_STATS_ACTION, get(get_budget_stats_action))
        .route(
            endpoints::CATEGORY_STATS_ACTION,
            get(get_category_breakdown_action),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard_json));

    protected_routes
        .merge(hx_routes)
        .merge(action_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
