//! Database initialization for the application.

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// Create the application tables in the database.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}
