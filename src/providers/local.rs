//! Implements the guest transaction provider: a fully functional,
//! zero-backend persistence surface for trial use, time-boxed to 24 hours
//! from first use.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    Error,
    clock::Clock,
    models::{Transaction, TransactionDraft, TransactionId, TransactionPatch},
    providers::{SlotStore, TransactionProvider},
};

/// The slot holding the JSON-serialized guest transaction list.
pub const TRANSACTIONS_SLOT: &str = "finflow_guest_transactions";

/// The slot holding the guest session start, milliseconds since the Unix
/// epoch.
pub const SESSION_START_SLOT: &str = "finflow_guest_session_start";

/// How long a guest session lives, measured from first use.
pub const GUEST_SESSION_TTL: time::Duration = time::Duration::hours(24);

/// The fixed artificial delay applied to every operation, so the UI's loading
/// states behave consistently regardless of provider.
const SIMULATED_LATENCY: Duration = Duration::from_millis(300);

/// Persists transactions in two named storage slots, expiring the whole
/// guest session 24 hours after first use.
///
/// Every mutation re-derives its working set through the same read path as
/// [TransactionProvider::get_all] rather than trusting a cached in-memory
/// copy, so the expiry check is re-applied before any write: a mutation
/// issued the instant after expiry sees an empty base list, not stale
/// pre-expiry data. The whole read-modify-write runs under an async mutex
/// that owns the slot store, so two in-flight mutations serialize instead of
/// losing the earlier write.
#[derive(Debug)]
pub struct LocalProvider<S, C> {
    store: Arc<Mutex<S>>,
    clock: C,
    latency: Duration,
}

impl<S, C: Clone> Clone for LocalProvider<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: self.clock.clone(),
            latency: self.latency,
        }
    }
}

impl<S, C> LocalProvider<S, C>
where
    S: SlotStore,
    C: Clock,
{
    /// Create a guest provider over `store` with the default simulated
    /// latency.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_latency(store, clock, SIMULATED_LATENCY)
    }

    /// Create a guest provider with an explicit simulated latency. Tests pass
    /// [Duration::ZERO].
    pub fn with_latency(store: S, clock: C, latency: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            clock,
            latency,
        }
    }

    fn now_millis(&self) -> i64 {
        (self.clock.now().unix_timestamp_nanos() / 1_000_000) as i64
    }

    /// The authoritative read path: enforce session expiry, then return the
    /// stored list. Callers must hold the store lock.
    fn read_current(&self, store: &mut S) -> Result<Vec<Transaction>, Error> {
        let now_millis = self.now_millis();

        if let Some(stamp) = store.read(SESSION_START_SLOT)? {
            let expired = match stamp.trim().parse::<i64>() {
                Ok(session_start_millis) => {
                    now_millis.saturating_sub(session_start_millis)
                        > GUEST_SESSION_TTL.whole_milliseconds() as i64
                }
                Err(_) => {
                    tracing::warn!("unreadable guest session stamp {stamp:?}, resetting session");
                    true
                }
            };

            if expired {
                tracing::info!("guest session expired, clearing guest transactions");
                store.remove(TRANSACTIONS_SLOT)?;
                store.remove(SESSION_START_SLOT)?;

                return Ok(Vec::new());
            }
        } else {
            store.write(SESSION_START_SLOT, &now_millis.to_string())?;
        }

        match store.read(TRANSACTIONS_SLOT)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, store: &mut S, transactions: &[Transaction]) -> Result<(), Error> {
        store.write(TRANSACTIONS_SLOT, &serde_json::to_string(transactions)?)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl<S, C> TransactionProvider for LocalProvider<S, C>
where
    S: SlotStore + Send,
    C: Clock,
{
    async fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.simulate_latency().await;

        let mut store = self.store.lock().await;
        self.read_current(&mut store)
    }

    async fn create(&self, draft: TransactionDraft) -> Result<(), Error> {
        self.simulate_latency().await;

        let mut store = self.store.lock().await;
        let mut current = self.read_current(&mut store)?;

        // Newest first.
        current.insert(0, draft.into_transaction(TransactionId::random()));

        self.persist(&mut store, &current)
    }

    async fn update(&self, id: TransactionId, patch: TransactionPatch) -> Result<(), Error> {
        self.simulate_latency().await;

        let mut store = self.store.lock().await;
        let mut current = self.read_current(&mut store)?;

        match current
            .iter_mut()
            .find(|transaction| transaction.id == id)
        {
            Some(transaction) => patch.apply_to(transaction),
            None => return Err(Error::UpdateMissingTransaction),
        }

        self.persist(&mut store, &current)
    }

    async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        self.simulate_latency().await;

        let mut store = self.store.lock().await;
        let mut current = self.read_current(&mut store)?;

        let length_before = current.len();
        current.retain(|transaction| transaction.id != id);

        if current.len() == length_before {
            return Err(Error::DeleteMissingTransaction);
        }

        self.persist(&mut store, &current)
    }
}
