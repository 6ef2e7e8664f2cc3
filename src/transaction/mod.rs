//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying and deleting transactions
//! - The HTTP endpoints of the transaction API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod query;
mod summary_endpoint;

pub use core::{
    Category, Transaction, TransactionBuilder, TransactionKind, create_transaction,
    create_transaction_table, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::TransactionFilter;
pub use summary_endpoint::{Summary, get_summary_endpoint};
