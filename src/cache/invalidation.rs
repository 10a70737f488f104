// Cache invalidation policy.
// Maps each mutation to the query classes it makes stale.

use crate::api::operations::{CreateItem, DeleteItem, ListItems, Operation, UpdateItem};

use super::store::QueryCache;

/// Query names a successful mutation invalidates.
pub fn invalidated_queries(mutation: &str) -> &'static [&'static str] {
    const ITEM_QUERIES: &[&str] = &[ListItems::NAME];
    const ITEM_MUTATIONS: [&str; 3] = [CreateItem::NAME, DeleteItem::NAME, UpdateItem::NAME];

    // Login acts through the credential instead, see `on_credential_change`
    if ITEM_MUTATIONS.contains(&mutation) {
        ITEM_QUERIES
    } else {
        &[]
    }
}

/// Applies staleness marking after successful mutations and credential changes.
#[derive(Debug, Clone, Copy)]
pub struct InvalidationPolicy {
    /// Drop every cached query when the user logs in or out.
    pub flush_on_credential_change: bool,
}

impl Default for InvalidationPolicy {
    fn default() -> Self {
        Self {
            flush_on_credential_change: true,
        }
    }
}

impl InvalidationPolicy {
    /// Mark every query class mapped to `mutation` stale. Returns entries marked.
    pub fn on_mutation_success(&self, mutation: &str, cache: &QueryCache) -> usize {
        let queries = invalidated_queries(mutation);
        if queries.is_empty() {
            return 0;
        }

        let marked = cache.invalidate(queries);
        tracing::debug!(mutation, ?queries, marked, "invalidated queries");
        marked
    }

    /// Called after the stored credential was written or cleared.
    pub fn on_credential_change(&self, cache: &QueryCache) -> usize {
        if !self.flush_on_credential_change {
            return 0;
        }

        let marked = cache.invalidate_all();
        tracing::debug!(marked, "credential changed, invalidated all queries");
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::operations::{Hello, Login};
    use crate::cache::CacheKey;
    use serde_json::json;

    fn cached(cache: &QueryCache, name: &str) -> CacheKey {
        let key = CacheKey::new(name, &json!({}));
        cache.store(key.clone(), json!({}), cache.epoch(name));
        key
    }

    #[test]
    fn test_mapping() {
        assert_eq!(invalidated_queries("createItem"), &["listItems"]);
        assert_eq!(invalidated_queries("updateItem"), &["listItems"]);
        assert_eq!(invalidated_queries("deleteItem"), &["listItems"]);
        assert!(invalidated_queries(Login::NAME).is_empty());
        assert!(invalidated_queries(Hello::NAME).is_empty());
    }

    #[test]
    fn test_item_mutations_mark_list_stale() {
        let policy = InvalidationPolicy::default();
        for mutation in ["createItem", "updateItem", "deleteItem"] {
            let cache = QueryCache::new();
            let list = cached(&cache, "listItems");
            let hello = cached(&cache, "hello");

            assert_eq!(policy.on_mutation_success(mutation, &cache), 1);
            assert!(cache.fresh(&list).is_none());
            assert!(cache.fresh(&hello).is_some());
        }
    }

    #[test]
    fn test_login_mutation_invalidates_nothing_directly() {
        let policy = InvalidationPolicy::default();
        let cache = QueryCache::new();
        let list = cached(&cache, "listItems");

        assert_eq!(policy.on_mutation_success("login", &cache), 0);
        assert!(cache.fresh(&list).is_some());
    }

    #[test]
    fn test_credential_change_flushes_when_enabled() {
        let cache = QueryCache::new();
        let hello = cached(&cache, "hello");

        let keep = InvalidationPolicy {
            flush_on_credential_change: false,
        };
        assert_eq!(keep.on_credential_change(&cache), 0);
        assert!(cache.fresh(&hello).is_some());

        assert_eq!(InvalidationPolicy::default().on_credential_change(&cache), 1);
        assert!(cache.fresh(&hello).is_none());
    }
}
