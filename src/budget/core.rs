//! Defines the budget model and its database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, ToSql, types::ToSqlOutput};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::{BudgetId, RowsAffected},
    transaction::{validate_amount, validate_category},
};

/// The CSS class used to colour a budget when none is given.
pub const DEFAULT_BUDGET_COLOR: &str = "bg-blue-500";

/// How often a budget's limit applies.
///
/// The period is only used for display, spending is not filtered by date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// The limit applies to each week.
    Weekly,
    /// The limit applies to each month.
    #[default]
    Monthly,
    /// The limit applies to each year.
    Yearly,
}

impl BudgetPeriod {
    /// All periods in the order they should be offered to users.
    pub const ALL: [BudgetPeriod; 3] = [
        BudgetPeriod::Weekly,
        BudgetPeriod::Monthly,
        BudgetPeriod::Yearly,
    ];

    /// The string stored in the database and used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    /// The capitalised name for display in HTML.
    pub fn label(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Yearly => "Yearly",
        }
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string is not a known budget period.
#[derive(Debug, thiserror::Error)]
#[error("\"{0}\" is not a valid budget period")]
pub struct ParseBudgetPeriodError(String);

impl FromStr for BudgetPeriod {
    type Err = ParseBudgetPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(ParseBudgetPeriodError(other.to_owned())),
        }
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Parse a stored period, falling back to the default for unknown text.
///
/// The period does not affect spending totals, so a budget with an unknown
/// period is still listed.
fn parse_stored_period(budget_id: BudgetId, period: &str) -> BudgetPeriod {
    period.parse().unwrap_or_else(|error| {
        tracing::warn!(
            "Budget {budget_id}: {error}, showing it as {}",
            BudgetPeriod::default()
        );
        BudgetPeriod::default()
    })
}

/// A spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user that owns the budget.
    pub user_id: UserID,
    /// The category key that expenses are matched against.
    pub category: String,
    /// The spending limit.
    pub amount: f64,
    /// How often the limit applies.
    pub period: BudgetPeriod,
    /// A CSS class used to colour the budget in the UI, e.g. "bg-blue-500".
    pub color: String,
    /// When the budget was created.
    pub created_at: OffsetDateTime,
}

fn default_color() -> String {
    DEFAULT_BUDGET_COLOR.to_owned()
}

/// The fields needed to create a [Budget].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    /// The category key that expenses are matched against.
    pub category: String,
    /// The spending limit, must be zero or positive.
    pub amount: f64,
    /// How often the limit applies, monthly if not given.
    #[serde(default)]
    pub period: BudgetPeriod,
    /// A CSS class used to colour the budget, "bg-blue-500" if not given.
    #[serde(default = "default_color")]
    pub color: String,
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                period TEXT NOT NULL DEFAULT 'monthly',
                color TEXT NOT NULL DEFAULT 'bg-blue-500',
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Budget.
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;
    let amount: f64 = row.get(3)?;
    let period: String = row.get(4)?;

    Ok(Budget {
        id,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: amount.abs(),
        period: parse_stored_period(id, &period),
        color: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Create a new budget owned by `user_id`.
///
/// An empty colour is replaced with [DEFAULT_BUDGET_COLOR].
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not a finite number,
/// - [Error::EmptyCategory] if the category is empty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    user_id: UserID,
    budget: NewBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    let amount = validate_amount(budget.amount)?;
    let category = validate_category(&budget.category)?;
    let color = match budget.color.trim() {
        "" => DEFAULT_BUDGET_COLOR,
        color => color,
    };

    let budget = connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount, period, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, category, amount, period, color, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                category,
                amount,
                budget.period,
                color,
                OffsetDateTime::now_utc(),
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve the budgets owned by `user_id` in the order they were created.
///
/// Rows with an unrecognised period are listed as monthly. Rows with other
/// malformed columns are skipped and logged.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budgets(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    let mut statement = connection.prepare(
        "SELECT id, user_id, category, amount, period, color, created_at
        FROM budget
        WHERE user_id = ?1
        ORDER BY id ASC",
    )?;

    let mut budgets = Vec::new();

    for row in statement.query_map([user_id.as_i64()], map_budget_row)? {
        match row {
            Ok(budget) => budgets.push(budget),
            Err(rusqlite::Error::FromSqlConversionFailure(column, _, error)) => {
                tracing::warn!(
                    "Skipping malformed budget for user {user_id} (column {column}): {error}"
                );
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(budgets)
}

/// Delete the budget `id` if it is owned by `user_id`.
///
/// Returns the number of rows affected, which is zero when `id` and
/// `user_id` do not match a budget.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_budget(
    id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(Error::from)
}
