use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::TransactionId};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Deletes are idempotent: an ID that is not in the database still gets a
/// 204 No Content response.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().unwrap();

    let rows_affected = delete_transaction(transaction_id, &connection)?;

    if rows_affected == 0 {
        tracing::debug!("transaction {transaction_id} was already deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

type RowsAffected = usize;

fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::{Connection, params};

    use crate::{
        database_id::TransactionId,
        initialize_db,
        transaction::{
            Transaction, create_transaction,
            delete_endpoint::{DeleteTransactionState, delete_transaction},
            delete_transaction_endpoint, map_transaction_row,
        },
    };

    #[test]
    fn test_deletes_transaction() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let transaction = create_transaction(Transaction::build(1.23, "Test"), &connection).unwrap();

        let rows_affected = delete_transaction(transaction.id, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(rusqlite::Error::QueryReturnedNoRows)
        )
    }

    #[tokio::test]
    async fn deleting_a_missing_transaction_succeeds() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let status = delete_transaction_endpoint(State(state), Path(1337))
            .await
            .expect("expected the delete to succeed");

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    fn get_transaction(
        id: TransactionId,
        connection: &Connection,
    ) -> Result<Transaction, rusqlite::Error> {
        connection.query_one(
            "SELECT * FROM \"transaction\" WHERE id = ?1",
            params![id],
            map_transaction_row,
        )
    }
}
