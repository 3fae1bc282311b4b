//! Implements the JSON API for listing, creating, updating and deleting
//! transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    models::{Transaction, TransactionDraft, TransactionId, TransactionPatch},
    providers::TransactionProvider,
    state::AppState,
    summary::{PeriodFilter, filter_by_period},
    timezone::local_today,
};

/// The query parameters accepted by the transaction list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// The period to narrow the list to, defaulting to the whole list.
    period: Option<String>,
}

/// A handler for listing transactions, most recent first, optionally narrowed
/// to a period.
///
/// # Errors
/// This function will return an [Error::InvalidPeriodFilter] if `period` is
/// not a recognised selector.
pub async fn get_transactions<P>(
    State(state): State<AppState<P>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    let period = match &query.period {
        Some(text) => text.parse()?,
        None => PeriodFilter::All,
    };

    let transactions = state.provider.get_all().await?;

    if period == PeriodFilter::All {
        return Ok(Json(transactions));
    }

    let today = local_today(state.local_offset);

    Ok(Json(filter_by_period(
        &transactions,
        period,
        today,
        state.local_offset,
    )))
}

/// A handler for creating a transaction from the posted draft.
///
/// The ID is assigned by the provider, never by the client.
///
/// # Errors
/// This function will return an [Error::AuthenticationRequired] if the
/// session's provider requires an identity and none is available.
pub async fn create_transaction<P>(
    State(state): State<AppState<P>>,
    Json(draft): Json<TransactionDraft>,
) -> Result<StatusCode, Error>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    state.provider.create(draft).await?;

    Ok(StatusCode::CREATED)
}

/// A handler for merging the posted patch into the transaction matching the
/// path ID. Present fields overwrite, absent fields are preserved.
///
/// # Errors
/// This function will return an [Error::UpdateMissingTransaction] if the ID
/// does not match an existing transaction.
pub async fn update_transaction<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
    Json(patch): Json<TransactionPatch>,
) -> Result<StatusCode, Error>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    state
        .provider
        .update(TransactionId::new(id), patch)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// A handler for deleting the transaction matching the path ID.
///
/// # Errors
/// This function will return an [Error::DeleteMissingTransaction] if the ID
/// does not match an existing transaction.
pub async fn delete_transaction<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    state.provider.delete(TransactionId::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod transaction_endpoint_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::UtcOffset;

    use crate::{
        build_router,
        clock::SystemClock,
        db::initialize,
        endpoints,
        models::Transaction,
        providers::{LocalProvider, MemorySlotStore, RemoteProvider, SqliteTransactionTable},
        state::AppState,
    };

    fn guest_server() -> TestServer {
        let provider = LocalProvider::with_latency(
            MemorySlotStore::new(),
            SystemClock,
            Duration::ZERO,
        );
        let state = AppState::new(provider, UtcOffset::UTC);

        TestServer::new(build_router(state))
    }

    fn lunch_body() -> serde_json::Value {
        json!({
            "description": "Lunch",
            "amount": 12.5,
            "type": "expense",
            "category": "Food",
            "date": "2026-01-10",
        })
    }

    #[tokio::test]
    async fn listing_an_empty_session_yields_an_empty_array() {
        let server = guest_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![]);
    }

    #[tokio::test]
    async fn created_transactions_appear_in_the_list_newest_first() {
        let server = guest_server();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&lunch_body())
            .await
            .assert_status(axum::http::StatusCode::CREATED);
        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "description": "Pay",
                "amount": 100.0,
                "type": "income",
                "category": "Work",
                "date": "2026-01-11",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>();

        let descriptions: Vec<&str> = transactions
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Pay", "Lunch"]);
        assert!(!transactions[0].id.as_str().is_empty());
    }

    #[tokio::test]
    async fn the_list_can_be_narrowed_to_a_month() {
        let server = guest_server();

        server.post(endpoints::TRANSACTIONS).json(&lunch_body()).await;
        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "description": "Rent",
                "amount": 800.0,
                "type": "expense",
                "category": "Housing",
                "date": "2026-02-01",
            }))
            .await;

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("period", "2026-01")
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Lunch");
    }

    #[tokio::test]
    async fn an_unrecognised_period_is_a_bad_request() {
        let server = guest_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("period", "yesterday")
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn updating_merges_only_the_posted_fields() {
        let server = guest_server();
        server.post(endpoints::TRANSACTIONS).json(&lunch_body()).await;

        let id = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>()
            .remove(0)
            .id;

        server
            .put(&format!("/api/transactions/{}", id.as_str()))
            .json(&json!({ "amount": 15.0 }))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        let updated = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>()
            .remove(0);
        assert_eq!(updated.amount, 15.0);
        assert_eq!(updated.description, "Lunch");
        assert_eq!(updated.id, id);
    }

    #[tokio::test]
    async fn updating_a_missing_transaction_is_not_found() {
        let server = guest_server();

        let response = server
            .put("/api/transactions/no-such-id")
            .json(&json!({ "amount": 1.0 }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn deleting_removes_the_transaction() {
        let server = guest_server();
        server.post(endpoints::TRANSACTIONS).json(&lunch_body()).await;

        let id = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>()
            .remove(0)
            .id;

        server
            .delete(&format!("/api/transactions/{}", id.as_str()))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        assert_eq!(
            server
                .get(endpoints::TRANSACTIONS)
                .await
                .json::<Vec<Transaction>>(),
            vec![]
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_transaction_is_not_found() {
        let server = guest_server();

        server
            .delete("/api/transactions/no-such-id")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn creating_without_an_identity_is_unauthorized() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let table = SqliteTransactionTable::new(Arc::new(Mutex::new(connection)));
        let provider = RemoteProvider::new(table, None);
        let server = TestServer::new(build_router(AppState::new(provider, UtcOffset::UTC)));

        let response = server.post(endpoints::TRANSACTIONS).json(&lunch_body()).await;

        response.assert_status_unauthorized();
    }
}
