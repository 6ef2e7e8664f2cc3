//! Defines the core data models and database functions for transactions.

use std::fmt::{self, Display};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::DatabaseId};

// ============================================================================
// MODELS
// ============================================================================

/// The fixed set of labels used to classify transactions for breakdown
/// reporting.
///
/// Labels are lowercase in both the API and the database, e.g. `"food"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Groceries, restaurants and takeaways.
    Food,
    /// Public transport, fuel and parking.
    Transport,
    /// Power, water, internet and phone bills.
    Utilities,
    /// Streaming, games, events and hobbies.
    Entertainment,
    /// Anything that does not fit the other labels.
    Other,
}

impl Category {
    /// The label used for this category in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "utilities" => Ok(Category::Utilities),
            "entertainment" => Ok(Category::Entertainment),
            "other" => Ok(Category::Other),
            label => Err(FromSqlError::Other(
                format!("invalid category label {label:?}").into(),
            )),
        }
    }
}

/// Whether a transaction records money earned or money spent.
///
/// Serialized as the `type` field in the API, since `type` is a keyword in
/// Rust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. rent.
    Expense,
}

impl TransactionKind {
    /// The label used for this kind in the API and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            label => Err(FromSqlError::Other(
                format!("invalid transaction kind {label:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The label classifying the transaction.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            description: description.to_owned(),
            category: None,
            date: None,
            kind: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Only the amount and description are required. Optional fields left unset
/// are filled with their defaults by [create_transaction], which also
/// validates the required fields and assigns the database ID.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Category, Transaction, TransactionKind};
///
/// let builder = Transaction::build(4.50, "Coffee")
///     .category(Some(Category::Food))
///     .date(Some(date!(2026 - 08 - 06)))
///     .kind(Some(TransactionKind::Expense));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Must be finite and at least zero. Whether the money came in or went
    /// out is captured by `kind`, not by the sign of the amount.
    pub amount: f64,

    /// A human-readable description of the transaction.
    ///
    /// Must not be empty or whitespace-only.
    pub description: String,

    /// The label classifying the transaction, e.g. [Category::Food].
    ///
    /// `None` defaults to [Category::Other].
    pub category: Option<Category>,

    /// The date when the transaction occurred.
    ///
    /// `None` defaults to the current date (UTC). This represents when the
    /// money moved, not when the transaction was recorded.
    pub date: Option<Date>,

    /// Whether the transaction is income or an expense.
    ///
    /// `None` defaults to [TransactionKind::Expense], since most recorded
    /// transactions are spending.
    pub kind: Option<TransactionKind>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Option<Date>) -> Self {
        self.date = date;
        self
    }

    /// Set the kind for the transaction.
    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = kind;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// Absent optional fields are filled in here: the category defaults to
/// [Category::Other], the date to the current date (UTC) and the kind to
/// [TransactionKind::Expense].
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyDescription] if the description is empty or whitespace,
/// - or [Error::InvalidAmount] if the amount is negative or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    if !builder.amount.is_finite() || builder.amount < 0.0 {
        return Err(Error::InvalidAmount(builder.amount));
    }

    let category = builder.category.unwrap_or(Category::Other);
    let date = builder
        .date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let kind = builder.kind.unwrap_or(TransactionKind::Expense);

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, category, date, kind)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, description, amount, category, date, kind",
        )?
        .query_row(
            (builder.description, builder.amount, category, date, kind),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                kind TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Index used by the date-ordered listing and the date range filter.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
///
/// **Note:** This function expects the row to contain all the table columns
/// in the order they were defined.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        kind: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        db::initialize,
        transaction::{Category, Transaction, TransactionKind, create_transaction},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(amount, "Weekly shop")
                .category(Some(Category::Food))
                .date(Some(date!(2026 - 08 - 01)))
                .kind(Some(TransactionKind::Expense)),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.description, "Weekly shop");
                assert_eq!(transaction.category, Category::Food);
                assert_eq!(transaction.date, date!(2026 - 08 - 01));
                assert_eq!(transaction.kind, TransactionKind::Expense);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fills_defaults() {
        let conn = get_test_connection();

        let transaction = create_transaction(Transaction::build(250.0, "Birthday money"), &conn)
            .expect("Could not create transaction");

        assert_eq!(transaction.category, Category::Other);
        assert_eq!(transaction.date, OffsetDateTime::now_utc().date());
        assert_eq!(transaction.kind, TransactionKind::Expense);
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(-4.50, "Coffee"), &conn);

        assert_eq!(result, Err(Error::InvalidAmount(-4.50)));
    }

    #[test]
    fn create_fails_on_non_finite_amount() {
        let conn = get_test_connection();

        for amount in [f64::NAN, f64::INFINITY] {
            let result = create_transaction(Transaction::build(amount, "Coffee"), &conn);

            assert!(
                matches!(result, Err(Error::InvalidAmount(_))),
                "want InvalidAmount for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn create_fails_on_blank_description() {
        let conn = get_test_connection();

        for description in ["", "   "] {
            let result = create_transaction(Transaction::build(1.0, description), &conn);

            assert_eq!(result, Err(Error::EmptyDescription));
        }
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let conn = get_test_connection();
        let mut last_id = 0;

        for i in 1..=5 {
            let transaction =
                create_transaction(Transaction::build(i as f64, "transaction"), &conn)
                    .expect("Could not create transaction");

            assert!(transaction.id > last_id);
            last_id = transaction.id;
        }
    }
}
