// Cache module for query responses.
// Holds cached payloads, the invalidation policy, subscriptions, and durable paths.

pub mod invalidation;
pub mod paths;
pub mod store;
pub mod subscription;

pub use invalidation::{InvalidationPolicy, invalidated_queries};
pub use store::{CacheEntry, CacheKey, Epoch, QueryCache};
pub use subscription::{Invalidation, QuerySubscription};
