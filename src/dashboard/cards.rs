//! Card components for the dashboard.
//!
//! Provides:
//! - Summary cards for the balance, income, expenses and savings rate
//! - Budget progress against each budget's limit
//! - The expense breakdown by category
//! - The most recent transactions

use maud::{Markup, html};

use crate::{
    currency::Currency,
    endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, currency_rounded_with_tooltip,
        progress_bar,
    },
    stats::{BalanceSummary, BudgetStatistics, CategorySpend, total_spent},
    transaction::{Transaction, TransactionType},
};

/// The number of transactions listed under "Recent Transactions".
pub(super) const RECENT_TRANSACTION_COUNT: usize = 5;

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0%".to_owned()
    } else {
        format!("{rounded:.0}%")
    }
}

fn stat_card(label: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-stat=(label) {
            p class="text-sm font-medium text-gray-500 dark:text-gray-400" { (label) }
            p class={ "mt-2 text-2xl font-bold " (value_style) } { (value) }
        }
    }
}

/// Renders the row of summary cards.
///
/// `format_money` turns an amount into display text in the user's currency.
pub(super) fn balance_cards(
    summary: &BalanceSummary,
    transaction_count: usize,
    format_money: &impl Fn(f64) -> String,
) -> Markup {
    let balance_style = if summary.total_balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    };

    html! {
        section class="w-full grid grid-cols-2 lg:grid-cols-4 gap-4" {
            (stat_card("Total Balance", &format_money(summary.total_balance), balance_style))
            (stat_card(
                "Income",
                &format_money(summary.total_income),
                "text-green-600 dark:text-green-400",
            ))
            (stat_card(
                "Expenses",
                &format_money(summary.total_expenses),
                "text-red-600 dark:text-red-400",
            ))
            (stat_card(
                "Savings Rate",
                &format_percentage(summary.savings_rate()),
                "text-blue-600 dark:text-blue-400",
            ))
        }
        p class="w-full mt-2 text-sm text-gray-500 dark:text-gray-400" {
            (transaction_count) " transactions recorded"
        }
    }
}

/// Renders the progress of each budget, or a prompt to create one.
pub(super) fn budget_progress_section(
    statistics: &[BudgetStatistics],
    format_money: &impl Fn(f64) -> String,
) -> Markup {
    html! {
        section class={ (CARD_STYLE) " space-y-4" } id="budget-progress" {
            div class="flex justify-between items-baseline" {
                h3 class="text-xl font-semibold" { "Budgets" }
                a href=(endpoints::BUDGETS_VIEW) class=(LINK_STYLE) { "Manage" }
            }

            @if statistics.is_empty() {
                p class="text-gray-500 dark:text-gray-400" {
                    "No budgets yet. "
                    a href=(endpoints::BUDGETS_VIEW) class=(LINK_STYLE) { "Create a budget" }
                    " to track spending by category."
                }
            }

            @for budget_statistics in statistics {
                div class="space-y-1" data-budget=(budget_statistics.budget.category) {
                    div class="flex justify-between text-sm" {
                        span class="font-medium" { (budget_statistics.budget.category) }
                        span {
                            (format_money(budget_statistics.spent))
                            " / "
                            (format_money(budget_statistics.total))
                        }
                    }

                    (progress_bar(
                        budget_statistics.percentage,
                        &budget_statistics.budget.color,
                        budget_statistics.is_over_budget(),
                    ))
                }
            }
        }
    }
}

fn category_bar_percentage(category: &CategorySpend, total: f64) -> f64 {
    if category.budget > 0.0 {
        category.percentage()
    } else if total > 0.0 {
        category.amount / total * 100.0
    } else {
        0.0
    }
}

/// Renders the expense total of each category.
///
/// Categories with a budget show their progress against the limit, other
/// categories show their share of all expenses.
pub(super) fn category_breakdown_section(
    categories: &[CategorySpend],
    format_money: &impl Fn(f64) -> String,
) -> Markup {
    let total = total_spent(categories);

    html! {
        section class={ (CARD_STYLE) " space-y-4" } id="category-breakdown" {
            div class="flex justify-between items-baseline" {
                h3 class="text-xl font-semibold" { "Spending by Category" }
                span class="text-sm text-gray-600 dark:text-gray-400" {
                    (format_money(total)) " total"
                }
            }

            @if categories.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No expenses recorded yet." }
            }

            @for category in categories {
                @let has_budget = category.budget > 0.0;

                div class="space-y-1" data-category=(category.name) {
                    div class="flex justify-between text-sm" {
                        span class="flex items-center gap-2 font-medium" {
                            span class={ "inline-block w-3 h-3 rounded-full " (category.color) } {}
                            (category.name)
                        }
                        span {
                            (format_money(category.amount))
                            @if has_budget {
                                " of " (format_money(category.budget))
                            }
                        }
                    }

                    (progress_bar(
                        category_bar_percentage(category, total),
                        &category.color,
                        has_budget && category.amount > category.budget,
                    ))
                }
            }
        }
    }
}

/// Renders the latest transactions, `transactions` should already be sorted most recent first.
pub(super) fn recent_transactions_section(
    transactions: &[Transaction],
    currency: Currency,
) -> Markup {
    html! {
        section class={ (CARD_STYLE) " space-y-4" } id="recent-transactions" {
            div class="flex justify-between items-baseline" {
                h3 class="text-xl font-semibold" { "Recent Transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
            }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                tbody {
                    @for transaction in transactions.iter().take(RECENT_TRANSACTION_COUNT) {
                        tr class=(TABLE_ROW_STYLE) {
                            td class=(TABLE_CELL_STYLE) { (transaction.date) }
                            td class=(TABLE_CELL_STYLE) {
                                div class="font-medium text-gray-900 dark:text-white" {
                                    (transaction.description)
                                }
                                div class="text-xs" { (transaction.category) }
                            }
                            td class={ (TABLE_CELL_STYLE) " text-right" } {
                                @match transaction.transaction_type {
                                    TransactionType::Income => {
                                        span class="text-green-600 dark:text-green-400" {
                                            "+" (currency_rounded_with_tooltip(transaction.amount, currency))
                                        }
                                    }
                                    TransactionType::Expense => {
                                        span class="text-red-600 dark:text-red-400" {
                                            "-" (currency_rounded_with_tooltip(transaction.amount, currency))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use maud::html;
    use scraper::{Html, Selector};

    use crate::{
        currency::Currency,
        stats::{BalanceSummary, CategorySpend, test_records::expense},
    };

    use super::{
        RECENT_TRANSACTION_COUNT, balance_cards, category_breakdown_section, format_percentage,
        recent_transactions_section,
    };

    fn format_money(amount: f64) -> String {
        Currency::Usd.format_rounded(amount)
    }

    fn stat_value(document: &Html, label: &str) -> String {
        let selector = Selector::parse(&format!("[data-stat=\"{label}\"] p + p")).unwrap();
        document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no stat card for {label}"))
            .text()
            .collect()
    }

    #[test]
    fn formats_percentage_without_negative_zero() {
        assert_eq!(format_percentage(-0.2), "0%");
        assert_eq!(format_percentage(42.6), "43%");
        assert_eq!(format_percentage(-150.0), "-150%");
    }

    #[test]
    fn balance_cards_show_totals_and_savings_rate() {
        let summary = BalanceSummary {
            total_income: 2000.0,
            total_expenses: 500.0,
            total_balance: 1500.0,
        };

        let markup = html!(div { (balance_cards(&summary, 3, &format_money)) }).into_string();
        let document = Html::parse_fragment(&markup);

        assert_eq!(stat_value(&document, "Total Balance"), "$1,500");
        assert_eq!(stat_value(&document, "Income"), "$2,000");
        assert_eq!(stat_value(&document, "Expenses"), "$500");
        assert_eq!(stat_value(&document, "Savings Rate"), "75%");
    }

    #[test]
    fn unbudgeted_category_shows_share_of_total() {
        let categories = [
            CategorySpend {
                name: "Food".to_owned(),
                amount: 75.0,
                budget: 0.0,
                color: "bg-orange-500".to_owned(),
            },
            CategorySpend {
                name: "Rent".to_owned(),
                amount: 25.0,
                budget: 0.0,
                color: "bg-pink-500".to_owned(),
            },
        ];

        let markup = category_breakdown_section(&categories, &format_money).into_string();
        let document = Html::parse_fragment(&markup);

        let selector = Selector::parse("[data-category=\"Food\"] [role=progressbar]").unwrap();
        let bar = document.select(&selector).next().unwrap();
        assert_eq!(bar.value().attr("aria-valuenow"), Some("75"));
    }

    #[test]
    fn lists_at_most_five_recent_transactions() {
        let transactions = (0..8)
            .map(|i| expense("food", f64::from(i)))
            .collect::<Vec<_>>();

        let markup = recent_transactions_section(&transactions, Currency::Usd).into_string();
        let document = Html::parse_fragment(&markup);

        let rows = document.select(&Selector::parse("tr").unwrap()).count();
        assert_eq!(rows, RECENT_TRANSACTION_COUNT);
    }
}
