//! Income, expense and balance totals.

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType};

/// The totals of a user's income and expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses as a magnitude.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub total_balance: f64,
}

impl BalanceSummary {
    /// The share of income that was not spent, as a percentage.
    ///
    /// Zero when there is no income. Negative when expenses exceed income.
    pub fn savings_rate(&self) -> f64 {
        if self.total_income > 0.0 {
            self.total_balance / self.total_income * 100.0
        } else {
            0.0
        }
    }
}

/// Sum the income and expenses in `transactions`.
pub fn summarize_balance(transactions: &[Transaction]) -> BalanceSummary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => total_expenses += transaction.amount,
        }
    }

    BalanceSummary {
        total_income,
        total_expenses,
        total_balance: total_income - total_expenses,
    }
}
