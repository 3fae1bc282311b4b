//! Implements the remote transaction provider: a thin proxy over a hosted
//! table-like store, scoping writes to the authenticated identity.

use std::future::Future;

use crate::{
    Error,
    models::{Transaction, TransactionDraft, TransactionId, TransactionPatch, UserId},
    providers::TransactionProvider,
};

/// The hosted single relational table of transaction rows, each tagged with
/// an owner identity reference.
///
/// This is the network boundary of the remote provider: production uses the
/// [SQLite table](crate::providers::SqliteTransactionTable), tests substitute
/// a fake. Ownership enforcement beyond tagging inserts is the store's
/// access policy, not this crate's concern. Errors surface to the caller
/// unmodified; no retry or backoff.
pub trait TransactionTable {
    /// All rows ordered by `date` descending. Yields an empty list, not an
    /// error, when there are no rows.
    fn select_all(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Insert a new row tagged with `owner`. The store assigns the ID.
    fn insert(
        &self,
        owner: &UserId,
        draft: &TransactionDraft,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Merge-update the row matching `id` with the present fields of
    /// `patch`.
    fn update(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Remove the row matching `id`.
    fn delete(&self, id: &TransactionId) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Proxies the four transaction operations to a hosted table.
///
/// The caller's resolved identity (or its absence) is injected once at
/// construction time, when the session's provider is selected, instead of
/// being re-queried from ambient session state on every call.
#[derive(Debug, Clone)]
pub struct RemoteProvider<T> {
    table: T,
    identity: Option<UserId>,
}

impl<T: TransactionTable> RemoteProvider<T> {
    /// Create a remote provider over `table` acting as `identity`.
    ///
    /// Passing `None` produces a provider that can read but whose
    /// [create](TransactionProvider::create) fails fast with
    /// [Error::AuthenticationRequired].
    pub fn new(table: T, identity: Option<UserId>) -> Self {
        Self { table, identity }
    }
}

impl<T> TransactionProvider for RemoteProvider<T>
where
    T: TransactionTable + Sync,
{
    async fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.table.select_all().await
    }

    async fn create(&self, draft: TransactionDraft) -> Result<(), Error> {
        let Some(owner) = &self.identity else {
            return Err(Error::AuthenticationRequired);
        };

        self.table.insert(owner, &draft).await
    }

    async fn update(&self, id: TransactionId, patch: TransactionPatch) -> Result<(), Error> {
        self.table.update(&id, &patch).await
    }

    async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        self.table.delete(&id).await
    }
}
