//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_summary_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests that match no API route fall through to the static client view
/// served from `static/`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .fallback_service(ServeDir::new("static/"))
        .with_state(state)
}
