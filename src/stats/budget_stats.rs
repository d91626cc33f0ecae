//! Spending against each budget.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    budget::Budget,
    stats::clamped_percentage,
    transaction::{Transaction, TransactionType},
};

/// A budget together with how much has been spent against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatistics {
    /// The budget these statistics are for.
    #[serde(flatten)]
    pub budget: Budget,
    /// The total of the expenses in the budget's category.
    pub spent: f64,
    /// The budget's limit.
    pub total: f64,
    /// The limit minus the amount spent. Negative when over budget.
    pub remaining: f64,
    /// The amount spent as a percentage of the limit, between 0 and 100.
    pub percentage: f64,
}

impl BudgetStatistics {
    /// Whether more has been spent than the budget allows.
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.total
    }
}

/// Sum the expenses in `transactions` by category.
pub(crate) fn expenses_by_category(transactions: &[Transaction]) -> HashMap<&str, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        if transaction.transaction_type == TransactionType::Expense {
            *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
        }
    }

    totals
}

/// Calculate the spending against each of `budgets`.
///
/// The output has one entry per budget in the same order as `budgets`.
/// Budgets that share a category each receive the full amount spent in that
/// category.
pub fn compute_budget_statistics(
    budgets: &[Budget],
    transactions: &[Transaction],
) -> Vec<BudgetStatistics> {
    let spending = expenses_by_category(transactions);

    budgets
        .iter()
        .map(|budget| {
            let spent = spending
                .get(budget.category.as_str())
                .copied()
                .unwrap_or(0.0);
            let total = budget.amount;

            BudgetStatistics {
                budget: budget.clone(),
                spent,
                total,
                remaining: total - spent,
                percentage: clamped_percentage(spent, total),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::stats::test_records::{budget, expense, income};

    use super::compute_budget_statistics;

    #[test]
    fn empty_inputs_give_no_statistics() {
        assert!(compute_budget_statistics(&[], &[]).is_empty());
    }

    #[test]
    fn over_budget() {
        let budgets = [budget("food", 200.0)];
        let transactions = [expense("food", 250.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].spent, 250.0);
        assert_eq!(stats[0].total, 200.0);
        assert_eq!(stats[0].remaining, -50.0);
        assert_eq!(stats[0].percentage, 100.0);
        assert!(stats[0].is_over_budget());
    }

    #[test]
    fn unmatched_category_has_zero_spend() {
        let budgets = [budget("food", 200.0)];
        let transactions = [expense("travel", 50.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(stats[0].spent, 0.0);
        assert_eq!(stats[0].total, 200.0);
        assert_eq!(stats[0].remaining, 200.0);
        assert_eq!(stats[0].percentage, 0.0);
        assert!(!stats[0].is_over_budget());
    }

    #[test]
    fn zero_amount_budget_has_zero_percentage() {
        let budgets = [budget("misc", 0.0)];
        let transactions = [expense("misc", 10.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(stats[0].spent, 10.0);
        assert_eq!(stats[0].total, 0.0);
        assert_eq!(stats[0].remaining, -10.0);
        assert_eq!(stats[0].percentage, 0.0);
        assert!(stats[0].percentage.is_finite());
    }

    #[test]
    fn partial_spend() {
        let budgets = [budget("food", 200.0)];
        let transactions = [expense("food", 30.0), expense("food", 20.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(stats[0].spent, 50.0);
        assert_eq!(stats[0].remaining, 150.0);
        assert_eq!(stats[0].percentage, 25.0);
    }

    #[test]
    fn income_does_not_count_as_spending() {
        let budgets = [budget("food", 200.0)];
        let transactions = [income("food", 500.0), expense("food", 20.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(stats[0].spent, 20.0);
    }

    #[test]
    fn preserves_budget_order() {
        let budgets = [budget("travel", 1.0), budget("food", 1.0), budget("bills", 1.0)];

        let stats = compute_budget_statistics(&budgets, &[]);

        let categories: Vec<_> = stats.iter().map(|s| s.budget.category.as_str()).collect();
        assert_eq!(categories, vec!["travel", "food", "bills"]);
    }

    // Spend is not split between budgets with the same category.
    #[test]
    fn duplicate_category_budgets_each_get_full_spend() {
        let budgets = [budget("food", 100.0), budget("food", 400.0)];
        let transactions = [expense("food", 80.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(stats[0].spent, 80.0);
        assert_eq!(stats[1].spent, 80.0);
        assert_eq!(stats[0].percentage, 80.0);
        assert_eq!(stats[1].percentage, 20.0);
    }

    #[test]
    fn is_idempotent() {
        let budgets = [budget("food", 200.0), budget("misc", 0.0)];
        let transactions = [expense("food", 250.0), expense("misc", 3.0)];

        let first = compute_budget_statistics(&budgets, &transactions);
        let second = compute_budget_statistics(&budgets, &transactions);

        assert_eq!(first, second);
    }

    #[test]
    fn serializes_budget_fields_alongside_statistics() {
        let budgets = [budget("food", 200.0)];
        let transactions = [expense("food", 50.0)];

        let stats = compute_budget_statistics(&budgets, &transactions);
        let json = serde_json::to_value(&stats[0]).unwrap();

        assert_eq!(json["category"], "food");
        assert_eq!(json["amount"], 200.0);
        assert_eq!(json["spent"], 50.0);
        assert_eq!(json["total"], 200.0);
        assert_eq!(json["remaining"], 150.0);
        assert_eq!(json["percentage"], 25.0);
    }
}
