//! Contains the transaction capability contract and the interchangeable
//! providers that implement it.
//!
//! A provider is selected once per session, guest or authenticated, and
//! injected into consuming code; all call sites depend only on the
//! [TransactionProvider] trait and stay unaware of which provider backs it.

mod local;
mod remote;
mod slot;
mod sqlite;

use std::future::Future;

pub use local::{GUEST_SESSION_TTL, LocalProvider, SESSION_START_SLOT, TRANSACTIONS_SLOT};
pub use remote::{RemoteProvider, TransactionTable};
pub use slot::{FileSlotStore, MemorySlotStore, SlotStore};
pub use sqlite::SqliteTransactionTable;

use crate::{
    Error,
    models::{Transaction, TransactionDraft, TransactionId, TransactionPatch},
};

/// Handles the persistence of transactions.
///
/// Every operation is asynchronous and resolves or fails exactly once; there
/// is no retry, cancellation or client-side timeout. The returned futures are
/// `Send` so the trait can back generic request handlers.
pub trait TransactionProvider {
    /// Retrieve the full current transaction set, most recent first.
    ///
    /// The remote provider orders by `date` descending; the guest provider
    /// returns insertion order with the newest creations prepended.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Create and persist a new transaction from `draft`.
    ///
    /// The ID is assigned here (guest mode) or by the backing store (remote
    /// mode), never by the caller. Exactly one new record appears in
    /// subsequent [TransactionProvider::get_all] calls.
    ///
    /// # Errors
    /// Returns an [Error::AuthenticationRequired] in remote mode when no
    /// authenticated identity is available; no write is performed.
    fn create(&self, draft: TransactionDraft) -> impl Future<Output = Result<(), Error>> + Send;

    /// Shallow-merge `patch` into the transaction matching `id`: present
    /// fields overwrite, absent fields are preserved.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTransaction] if `id` does not match an
    /// existing transaction.
    fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Remove the transaction matching `id`.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingTransaction] if `id` does not match an
    /// existing transaction.
    fn delete(&self, id: TransactionId) -> impl Future<Output = Result<(), Error>> + Send;
}
