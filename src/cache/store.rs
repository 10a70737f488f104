// In-memory response cache for query operations.
// Entries live for the lifetime of the client and are only ever marked stale, never evicted.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

use super::subscription::{Invalidation, QuerySubscription};

const EVENT_CAPACITY: usize = 64;

/// Operation name plus serialized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: String,
    arguments: String,
}

impl CacheKey {
    /// Build a key. Object keys serialize in sorted order, so equal arguments give equal keys.
    pub fn new(operation: &str, arguments: &Value) -> Self {
        Self {
            operation: operation.to_string(),
            arguments: arguments.to_string(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Last known result of a query plus its staleness flag.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response payload.
    pub data: Value,
    /// When the payload was fetched.
    pub cached_at: DateTime<Utc>,
    /// Whether the next read must go to the network.
    pub stale: bool,
}

impl CacheEntry {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
            stale: false,
        }
    }

    /// Time since the payload was fetched.
    pub fn age(&self) -> Duration {
        Utc::now() - self.cached_at
    }
}

/// Invalidation counters observed when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    global: u64,
    query: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    query_epochs: HashMap<String, u64>,
    global_epoch: u64,
}

impl CacheState {
    fn epoch(&self, operation: &str) -> Epoch {
        Epoch {
            global: self.global_epoch,
            query: self.query_epochs.get(operation).copied().unwrap_or(0),
        }
    }
}

/// Shared query cache. Clones refer to the same entries.
#[derive(Debug, Clone)]
pub struct QueryCache {
    state: Arc<Mutex<CacheState>>,
    events: broadcast::Sender<Invalidation>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            events,
        }
    }

    /// Cached payload if present and not stale.
    pub fn fresh(&self, key: &CacheKey) -> Option<Value> {
        self.state
            .lock()
            .entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.data.clone())
    }

    /// Entry regardless of staleness.
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.state.lock().entries.get(key).cloned()
    }

    /// Snapshot to pass back to `store` once the fetch completes.
    pub fn epoch(&self, operation: &str) -> Epoch {
        self.state.lock().epoch(operation)
    }

    /// Store a fetched payload unless its query was invalidated since `started`.
    ///
    /// Returns whether the payload was written.
    pub fn store(&self, key: CacheKey, data: Value, started: Epoch) -> bool {
        let mut state = self.state.lock();
        if state.epoch(key.operation()) != started {
            return false;
        }
        state.entries.insert(key, CacheEntry::new(data));
        true
    }

    /// Mark every entry of the named queries stale, then notify subscribers.
    ///
    /// Returns the number of entries that turned stale.
    pub fn invalidate(&self, queries: &[&str]) -> usize {
        let marked = {
            let mut state = self.state.lock();
            for query in queries {
                *state.query_epochs.entry((*query).to_string()).or_insert(0) += 1;
            }
            mark_stale(&mut state.entries, |key| queries.contains(&key.operation()))
        };

        for query in queries {
            // No receivers is fine
            let _ = self.events.send(Invalidation::Query((*query).to_string()));
        }
        marked
    }

    /// Mark every entry stale, then notify all subscribers.
    pub fn invalidate_all(&self) -> usize {
        let marked = {
            let mut state = self.state.lock();
            state.global_epoch += 1;
            mark_stale(&mut state.entries, |_| true)
        };

        let _ = self.events.send(Invalidation::All);
        marked
    }

    /// Register interest in invalidations of one query.
    pub fn subscribe(&self, query: &str) -> QuerySubscription {
        QuerySubscription::new(query, self.events.subscribe())
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mark_stale(
    entries: &mut HashMap<CacheKey, CacheEntry>,
    matches: impl Fn(&CacheKey) -> bool,
) -> usize {
    let mut marked = 0;
    for (key, entry) in entries.iter_mut() {
        if matches(key) && !entry.stale {
            entry.stale = true;
            marked += 1;
        }
    }
    marked
}
