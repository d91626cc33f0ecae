//! Aggregates a user's transactions and budgets into spending statistics.
//!
//! Every function in this module is a pure computation over its inputs. The
//! caller is responsible for passing in records owned by a single user.

mod balance;
mod budget_stats;
mod category_breakdown;

pub use balance::{BalanceSummary, summarize_balance};
pub use budget_stats::{BudgetStatistics, compute_budget_statistics};
pub use category_breakdown::{CategorySpend, compute_category_breakdown, total_spent};

/// Calculate `part` as a percentage of `whole`, capped at 100.
///
/// Returns zero when `whole` is not positive.
pub(crate) fn clamped_percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole * 100.0).min(100.0)
    } else {
        0.0
    }
}
