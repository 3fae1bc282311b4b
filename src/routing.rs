//! Defines the JSON API routes and how requests map to handlers.

use axum::{
    Router,
    routing::{get, put},
};

use crate::{dashboard, endpoints, providers::TransactionProvider, state::AppState, transaction};

/// Return the router for the JSON API, backed by the provider in `state`.
pub fn build_router<P>(state: AppState<P>) -> Router
where
    P: TransactionProvider + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(transaction::get_transactions::<P>).post(transaction::create_transaction::<P>),
        )
        .route(
            endpoints::TRANSACTION,
            put(transaction::update_transaction::<P>).delete(transaction::delete_transaction::<P>),
        )
        .route(endpoints::SUMMARY, get(dashboard::get_summary::<P>))
        .with_state(state)
}
