//! The API endpoint URIs.

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/expenses";
/// The route to delete a single transaction.
pub const TRANSACTION: &str = "/api/expenses/{transaction_id}";
/// The route for the aggregate income, expense and balance totals.
pub const SUMMARY: &str = "/api/summary";
