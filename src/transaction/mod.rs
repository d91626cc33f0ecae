//! Transactions: the money a user earned or spent.
//!
//! This module contains:
//! - The `Transaction` model and the queries for storing and editing transactions,
//! - The transactions page and the form endpoints for creating, editing and deleting transactions.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod transactions_page;

pub use core::{
    NewTransaction, ParseTransactionTypeError, Transaction, TransactionType, TransactionUpdate,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, map_transaction_row, update_transaction,
};
pub(crate) use core::{validate_amount, validate_category};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use transactions_page::get_transactions_page;
