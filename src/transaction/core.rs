//! Defines the core data models and database queries for transactions.
//!
//! Every query in this module is scoped to a single owner: reads filter on
//! `user_id`, and updates and deletes match both `id` and `user_id` in the
//! same statement.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    auth::UserID,
    database_id::{RowsAffected, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string stored in the database and used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string is neither "income" nor "expense".
#[derive(Debug, thiserror::Error)]
#[error("\"{0}\" is not a valid transaction type")]
pub struct ParseTransactionTypeError(String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ParseTransactionTypeError(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that created the transaction.
    pub user_id: UserID,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The magnitude of the amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The category key, e.g. "food", used to match transactions against budgets.
    pub category: String,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

/// The fields needed to create a [Transaction].
///
/// The ID, owner and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The magnitude of the amount, must be zero or positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The category key.
    pub category: String,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// A partial update to a [Transaction].
///
/// Fields set to `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    /// The new description.
    #[serde(default)]
    pub description: Option<String>,
    /// The new amount, must be zero or positive.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new date.
    #[serde(default)]
    pub date: Option<Date>,
    /// The new category key.
    #[serde(default)]
    pub category: Option<String>,
    /// The new transaction type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl From<NewTransaction> for TransactionUpdate {
    fn from(transaction: NewTransaction) -> Self {
        Self {
            description: Some(transaction.description),
            amount: Some(transaction.amount),
            date: Some(transaction.date),
            category: Some(transaction.category),
            transaction_type: Some(transaction.transaction_type),
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Check that `amount` is a finite magnitude.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `amount` is negative, infinite or NaN.
pub(crate) fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

/// Trim `category` and check that it is not empty.
///
/// # Errors
/// Returns [Error::EmptyCategory] if `category` is empty or only whitespace.
pub(crate) fn validate_category(category: &str) -> Result<String, Error> {
    let category = category.trim();

    if category.is_empty() {
        Err(Error::EmptyCategory)
    } else {
        Ok(category.to_owned())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str =
    "id, user_id, description, amount, date, category, type, created_at";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Amounts stored with a sign are normalised to their magnitude.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let description = row.get(2)?;
    let amount: f64 = row.get(3)?;
    let date = row.get(4)?;
    let category = row.get(5)?;
    let transaction_type = row.get(6)?;
    let created_at = row.get(7)?;

    Ok(Transaction {
        id,
        user_id,
        description,
        amount: amount.abs(),
        date,
        category,
        transaction_type,
        created_at,
    })
}

/// Create a new transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not a finite number,
/// - [Error::EmptyCategory] if the category is empty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = validate_amount(transaction.amount)?;
    let category = validate_category(&transaction.category)?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, description, amount, date, category, type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                transaction.description.trim(),
                amount,
                transaction.date,
                category,
                transaction.transaction_type,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` if it is owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions owned by `user_id`, most recent first.
///
/// Rows with an unrecognised transaction type are skipped and logged.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(user_id: UserID, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM \"transaction\"
        WHERE user_id = ?1
        ORDER BY date DESC, id DESC"
    ))?;

    let mut transactions = Vec::new();

    for row in statement.query_map([user_id.as_i64()], map_transaction_row)? {
        match row {
            Ok(transaction) => transactions.push(transaction),
            Err(rusqlite::Error::FromSqlConversionFailure(column, _, error)) => {
                tracing::warn!(
                    "Skipping malformed transaction for user {user_id} (column {column}): {error}"
                );
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(transactions)
}

/// Update the fields set in `update` on the transaction `id` owned by `user_id`.
///
/// Returns the number of rows affected, which is zero when `id` and
/// `user_id` do not match a transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the new amount is negative or not a finite number,
/// - [Error::EmptyCategory] if the new category is empty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let amount = update.amount.map(validate_amount).transpose()?;
    let category = update
        .category
        .as_deref()
        .map(validate_category)
        .transpose()?;
    let description = update.description.as_deref().map(str::trim);

    connection
        .execute(
            "UPDATE \"transaction\"
            SET \
                description = COALESCE(?1, description), \
                amount = COALESCE(?2, amount), \
                date = COALESCE(?3, date), \
                category = COALESCE(?4, category), \
                type = COALESCE(?5, type) \
            WHERE id = ?6 AND user_id = ?7;",
            (
                description,
                amount,
                update.date,
                category,
                update.transaction_type,
                id,
                user_id.as_i64(),
            ),
        )
        .map_err(Error::from)
}

/// Delete the transaction `id` if it is owned by `user_id`.
///
/// Returns the number of rows affected, which is zero when `id` and
/// `user_id` do not match a transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::UserID,
        test_utils::{get_test_connection, insert_test_user},
        transaction::{
            NewTransaction, TransactionType, TransactionUpdate, create_transaction,
            delete_transaction, get_transaction, get_transactions, update_transaction,
        },
    };

    fn new_expense(amount: f64, category: &str) -> NewTransaction {
        NewTransaction {
            description: "Test".to_owned(),
            amount,
            date: date!(2025 - 10 - 05),
            category: category.to_owned(),
            transaction_type: TransactionType::Expense,
        }
    }

    fn setup() -> (Connection, UserID, UserID) {
        let conn = get_test_connection();
        let alice = insert_test_user(&conn, "alice@example.com");
        let bob = insert_test_user(&conn, "bob@example.com");

        (conn, alice, bob)
    }

    #[test]
    fn create_succeeds() {
        let (conn, alice, _) = setup();

        let transaction = create_transaction(alice, new_expense(12.3, "food"), &conn).unwrap();

        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.user_id, alice);
        assert_eq!(transaction.category, "food");
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let (conn, alice, _) = setup();

        let result = create_transaction(alice, new_expense(-12.3, "food"), &conn);

        assert_eq!(result, Err(Error::InvalidAmount(-12.3)));
    }

    #[test]
    fn create_fails_on_nan_amount() {
        let (conn, alice, _) = setup();

        let result = create_transaction(alice, new_expense(f64::NAN, "food"), &conn);

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn create_fails_on_empty_category() {
        let (conn, alice, _) = setup();

        let result = create_transaction(alice, new_expense(1.0, "  "), &conn);

        assert_eq!(result, Err(Error::EmptyCategory));
    }

    #[test]
    fn get_transactions_returns_most_recent_first() {
        let (conn, alice, _) = setup();
        let mut older = new_expense(1.0, "food");
        older.date = date!(2025 - 01 - 01);
        let mut newer = new_expense(2.0, "food");
        newer.date = date!(2025 - 02 - 01);
        create_transaction(alice, older, &conn).unwrap();
        create_transaction(alice, newer, &conn).unwrap();

        let transactions = get_transactions(alice, &conn).unwrap();

        let dates: Vec<_> = transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date!(2025 - 02 - 01), date!(2025 - 01 - 01)]);
    }

    #[test]
    fn get_transactions_only_returns_owned_rows() {
        let (conn, alice, bob) = setup();
        create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();
        create_transaction(bob, new_expense(2.0, "food"), &conn).unwrap();

        let transactions = get_transactions(alice, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert!(transactions.iter().all(|t| t.user_id == alice));
    }

    #[test]
    fn get_transaction_of_other_user_is_not_found() {
        let (conn, alice, bob) = setup();
        let transaction = create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, bob, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn signed_amounts_are_read_as_magnitudes() {
        let (conn, alice, _) = setup();
        conn.execute(
            "INSERT INTO \"transaction\" (user_id, description, amount, date, category, type, created_at)
            VALUES (?1, 'legacy', -42.5, '2025-01-01', 'food', 'expense', '2025-01-01 00:00:00+00:00')",
            [alice.as_i64()],
        )
        .unwrap();

        let transactions = get_transactions(alice, &conn).unwrap();

        assert_eq!(transactions[0].amount, 42.5);
    }

    #[test]
    fn rows_with_unknown_type_are_skipped() {
        let (conn, alice, _) = setup();
        create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();
        conn.execute(
            "INSERT INTO \"transaction\" (user_id, description, amount, date, category, type, created_at)
            VALUES (?1, 'legacy', 10, '2025-01-01', 'food', 'transfer', '2025-01-01 00:00:00+00:00')",
            [alice.as_i64()],
        )
        .unwrap();

        let transactions = get_transactions(alice, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 1.0);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let (conn, alice, _) = setup();
        let transaction = create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();

        let rows_affected = update_transaction(
            transaction.id,
            alice,
            TransactionUpdate {
                amount: Some(99.0),
                transaction_type: Some(TransactionType::Income),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(rows_affected, 1);
        let got = get_transaction(transaction.id, alice, &conn).unwrap();
        assert_eq!(got.amount, 99.0);
        assert_eq!(got.transaction_type, TransactionType::Income);
        assert_eq!(got.description, transaction.description);
        assert_eq!(got.category, transaction.category);
        assert_eq!(got.date, transaction.date);
        assert_eq!(got.created_at, transaction.created_at);
    }

    #[test]
    fn update_of_other_users_transaction_affects_nothing() {
        let (conn, alice, bob) = setup();
        let transaction = create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();

        let rows_affected = update_transaction(
            transaction.id,
            bob,
            TransactionUpdate {
                amount: Some(99.0),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(rows_affected, 0);
        let got = get_transaction(transaction.id, alice, &conn).unwrap();
        assert_eq!(got.amount, 1.0);
    }

    #[test]
    fn update_rejects_negative_amount() {
        let (conn, alice, _) = setup();
        let transaction = create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();

        let result = update_transaction(
            transaction.id,
            alice,
            TransactionUpdate {
                amount: Some(-1.0),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-1.0)));
    }

    #[test]
    fn delete_removes_owned_transaction() {
        let (conn, alice, _) = setup();
        let transaction = create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();

        let rows_affected = delete_transaction(transaction.id, alice, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(
            get_transaction(transaction.id, alice, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_of_other_users_transaction_affects_nothing() {
        let (conn, alice, bob) = setup();
        let transaction = create_transaction(alice, new_expense(1.0, "food"), &conn).unwrap();

        let rows_affected = delete_transaction(transaction.id, bob, &conn).unwrap();

        assert_eq!(rows_affected, 0);
        assert!(get_transaction(transaction.id, alice, &conn).is_ok());
    }

    #[test]
    fn delete_missing_transaction_affects_nothing() {
        let (conn, alice, _) = setup();

        assert_eq!(delete_transaction(42, alice, &conn), Ok(0));
    }
}
