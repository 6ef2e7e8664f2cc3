//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    transaction::{Category, Transaction, TransactionKind, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionBody {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The label classifying the transaction. Defaults to `other`.
    #[serde(default)]
    pub category: Option<Category>,
    /// The date when the transaction occurred. Defaults to the current date.
    #[serde(default)]
    pub date: Option<Date>,
    /// Whether the transaction is income or an expense. Defaults to `expense`.
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionKind>,
}

/// A route handler for creating a new transaction, returns the stored record
/// on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(body): Json<CreateTransactionBody>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let builder = Transaction::build(body.amount, &body.description)
        .category(body.category)
        .date(body.date)
        .kind(body.kind);

    let connection = state.db_connection.lock().unwrap();

    create_transaction(builder, &connection)
        .map(|transaction| (StatusCode::CREATED, Json(transaction)))
}
