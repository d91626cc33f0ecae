//! Dashboard module
//!
//! Provides an overview page with the user's balance, budget progress,
//! spending by category and most recent transactions.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
