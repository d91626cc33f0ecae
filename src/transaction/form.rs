use std::collections::BTreeSet;

use maud::{Markup, html};
use time::Date;

use crate::{
    budget::Budget,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::{Transaction, TransactionType},
};

/// The id of the `<datalist>` holding category suggestions.
const CATEGORY_OPTIONS_ID: &str = "category-options";

/// The values a transaction form starts with.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub autofocus_amount: bool,
}

/// The distinct categories used by `budgets` and `transactions`, sorted alphabetically.
pub fn known_categories(transactions: &[Transaction], budgets: &[Budget]) -> Vec<String> {
    budgets
        .iter()
        .map(|budget| budget.category.as_str())
        .chain(transactions.iter().map(|transaction| transaction.category.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// The inputs shared by the create and edit transaction forms.
///
/// `known_categories` are offered as suggestions for the category input,
/// any other category may still be typed in.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    known_categories: &[String],
) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex-1"
                {
                    input
                        name="type"
                        id="transaction-type-expense"
                        type="radio"
                        value=(TransactionType::Expense)
                        checked[is_expense]
                        required
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex-1"
                {
                    input
                        name="type"
                        id="transaction-type-income"
                        type="radio"
                        value=(TransactionType::Income)
                        checked[!is_expense]
                        required
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                list=(CATEGORY_OPTIONS_ID)
                placeholder="e.g. food"
                value=[defaults.category]
                required
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id=(CATEGORY_OPTIONS_ID)
            {
                @for category in known_categories {
                    option value=(category) {}
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
