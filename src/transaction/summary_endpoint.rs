//! Defines the endpoint for the aggregate transaction summary.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The state needed to compute the transaction summary.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Aggregate totals derived from all transactions.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all expense amounts.
    pub total_expenses: f64,
    /// The sum of all income amounts.
    pub total_income: f64,
    /// Income minus expenses.
    pub balance: f64,
}

/// A route handler for the aggregate income, expense and balance totals.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
) -> Result<Json<Summary>, Error> {
    let connection = state.db_connection.lock().unwrap();

    get_summary(&connection).map(Json)
}

/// Sum the expense and income amounts over the whole store in one pass.
///
/// An empty store sums to zero on both sides.
fn get_summary(connection: &Connection) -> Result<Summary, Error> {
    let (total_expenses, total_income) = connection
        .prepare(
            "SELECT COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount END), 0.0),
                    COALESCE(SUM(CASE WHEN kind = 'income' THEN amount END), 0.0)
             FROM \"transaction\"",
        )?
        .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    Ok(Summary {
        total_expenses,
        total_income,
        balance: total_income - total_expenses,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{Summary, get_summary};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn empty_store_sums_to_zero() {
        let conn = get_test_connection();

        let summary = get_summary(&conn).expect("Could not get summary");

        assert_eq!(
            summary,
            Summary {
                total_expenses: 0.0,
                total_income: 0.0,
                balance: 0.0,
            }
        );
    }

    #[test]
    fn single_expense_gives_negative_balance() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(4.50, "Coffee"), &conn).unwrap();

        let summary = get_summary(&conn).expect("Could not get summary");

        assert_eq!(
            summary,
            Summary {
                total_expenses: 4.50,
                total_income: 0.0,
                balance: -4.50,
            }
        );
    }

    #[test]
    fn balance_is_income_minus_expenses() {
        let conn = get_test_connection();
        let amounts = [
            (2000.0, TransactionKind::Income),
            (150.0, TransactionKind::Expense),
            (49.5, TransactionKind::Expense),
            (25.0, TransactionKind::Income),
        ];
        for (amount, kind) in amounts {
            create_transaction(
                Transaction::build(amount, "transaction").kind(Some(kind)),
                &conn,
            )
            .unwrap();
        }

        let summary = get_summary(&conn).expect("Could not get summary");

        assert_eq!(summary.total_income, 2025.0);
        assert_eq!(summary.total_expenses, 199.5);
        assert_eq!(summary.balance, summary.total_income - summary.total_expenses);
    }
}
