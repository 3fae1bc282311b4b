//! Implements a struct that holds the state of the JSON API server.

use time::UtcOffset;

use crate::providers::TransactionProvider;

/// The state of the API server.
///
/// The provider is selected once per session, at startup, and injected here;
/// request handlers operate only through the capability contract and stay
/// unaware of which provider backs it.
#[derive(Debug, Clone)]
pub struct AppState<P>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    /// The provider for persisting [transactions](crate::models::Transaction).
    pub provider: P,
    /// The UTC offset of the server's configured timezone, used to resolve
    /// local calendar dates.
    pub local_offset: UtcOffset,
}

impl<P> AppState<P>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(provider: P, local_offset: UtcOffset) -> Self {
        Self {
            provider,
            local_offset,
        }
    }
}
