//! Budgets: spending limits for a category of expenses.

mod budgets_page;
mod core;
mod create_endpoint;
mod delete_endpoint;

pub use budgets_page::get_budgets_page;
pub use core::{
    Budget, BudgetPeriod, DEFAULT_BUDGET_COLOR, NewBudget, ParseBudgetPeriodError, create_budget,
    create_budget_table, delete_budget, get_budgets, map_budget_row,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
