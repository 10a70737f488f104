// Query subscriptions.
// Lets a view register interest in a named query and learn when it goes stale.

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

/// Invalidation event broadcast after entries are marked stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// Every entry of one query name.
    Query(String),
    /// Every cached query.
    All,
}

impl Invalidation {
    pub fn affects(&self, query: &str) -> bool {
        match self {
            Invalidation::Query(name) => name == query,
            Invalidation::All => true,
        }
    }
}

/// Receiver of invalidations for one query name.
#[derive(Debug)]
pub struct QuerySubscription {
    query: String,
    receiver: broadcast::Receiver<Invalidation>,
}

impl QuerySubscription {
    pub(crate) fn new(query: &str, receiver: broadcast::Receiver<Invalidation>) -> Self {
        Self {
            query: query.to_string(),
            receiver,
        }
    }

    /// Query name this subscription watches.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Wait for the next invalidation of the watched query.
    ///
    /// Returns false once the cache is gone and no more events can arrive.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.affects(&self.query) => return true,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    // Missed events may have covered this query
                    tracing::debug!(query = %self.query, skipped, "subscription lagged");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }

    /// Drain queued events without waiting. True if any touched the watched query.
    pub fn has_pending(&mut self) -> bool {
        let mut pending = false;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => pending |= event.affects(&self.query),
                Err(TryRecvError::Lagged(_)) => pending = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return pending,
            }
        }
    }
}
