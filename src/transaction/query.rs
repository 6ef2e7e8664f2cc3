//! Filtered queries over the transaction store.

use rusqlite::{Connection, ToSql, params_from_iter};
use serde::Deserialize;
use time::Date;

use crate::Error;

use super::core::{Category, Transaction, TransactionKind, map_transaction_row};

/// The filters that may be applied when listing transactions.
///
/// All supplied filters must match (conjunction). Deserializes directly from
/// the query string of the listing endpoint, so the field names follow the
/// API's camelCase convention.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Only return transactions with this category.
    pub category: Option<Category>,
    /// Only return transactions of this kind.
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// The inclusive start of the date range. Ignored unless `end_date` is
    /// also present.
    pub start_date: Option<Date>,
    /// The inclusive end of the date range. Ignored unless `start_date` is
    /// also present.
    pub end_date: Option<Date>,
}

/// Get the transactions matching `filter`, newest first.
///
/// Transactions are sorted by descending date, then by descending ID so that
/// the most recently recorded entry for a date comes first.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn list_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut clauses = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(category) = filter.category {
        clauses.push("category = ?");
        params.push(Box::new(category));
    }

    if let Some(kind) = filter.kind {
        clauses.push("kind = ?");
        params.push(Box::new(kind));
    }

    // The date range only applies when both bounds are given, matching the
    // pair of date inputs on the client.
    if let (Some(start_date), Some(end_date)) = (filter.start_date, filter.end_date) {
        clauses.push("date BETWEEN ? AND ?");
        params.push(Box::new(start_date));
        params.push(Box::new(end_date));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", clauses.join(" AND "))
    };

    let query = format!(
        "SELECT id, description, amount, category, date, kind FROM \"transaction\" \
        {where_clause}ORDER BY date DESC, id DESC"
    );

    connection
        .prepare(&query)?
        .query_map(
            params_from_iter(params.iter().map(|param| param.as_ref())),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
