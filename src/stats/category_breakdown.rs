//! Expense totals grouped by category for the dashboard.

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    budget::Budget,
    stats::clamped_percentage,
    transaction::{Transaction, TransactionType},
};

/// Colours given to categories that do not have a budget.
const PALETTE: [&str; 7] = [
    "bg-orange-500",
    "bg-pink-500",
    "bg-blue-500",
    "bg-emerald-500",
    "bg-purple-500",
    "bg-red-500",
    "bg-cyan-500",
];

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    /// The category name for display.
    pub name: String,
    /// The total of the expenses in the category.
    pub amount: f64,
    /// The limit of the category's budget, or zero if there is no budget.
    pub budget: f64,
    /// A CSS class used to colour the category.
    pub color: String,
}

impl CategorySpend {
    /// The amount spent as a percentage of the budget, between 0 and 100.
    pub fn percentage(&self) -> f64 {
        clamped_percentage(self.amount, self.budget)
    }
}

/// The sum of the amounts spent across `categories`.
pub fn total_spent(categories: &[CategorySpend]) -> f64 {
    categories.iter().map(|category| category.amount).sum()
}

/// Upper-case the first character of `category`.
fn display_name(category: &str) -> String {
    let mut graphemes = category.graphemes(true);

    match graphemes.next() {
        Some(first) => first.to_uppercase() + graphemes.as_str(),
        None => String::new(),
    }
}

/// Group the expenses in `transactions` by category.
///
/// Categories are listed in the order they first appear among the expenses.
/// A category takes its budget limit and colour from the first budget with
/// the same category, otherwise it gets no limit and a colour from a fixed
/// palette.
pub fn compute_category_breakdown(
    transactions: &[Transaction],
    budgets: &[Budget],
) -> Vec<CategorySpend> {
    let mut categories: Vec<(&str, f64)> = Vec::new();

    for transaction in transactions {
        if transaction.transaction_type != TransactionType::Expense {
            continue;
        }

        match categories
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some((_, amount)) => *amount += transaction.amount,
            None => categories.push((transaction.category.as_str(), transaction.amount)),
        }
    }

    categories
        .into_iter()
        .enumerate()
        .map(|(index, (category, amount))| {
            let (budget, color) = match budgets.iter().find(|budget| budget.category == category) {
                Some(budget) => (budget.amount, budget.color.clone()),
                None => (0.0, PALETTE[index % PALETTE.len()].to_owned()),
            };

            CategorySpend {
                name: display_name(category),
                amount,
                budget,
                color,
            }
        })
        .collect()
}
