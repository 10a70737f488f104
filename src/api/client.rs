// API client.
// Executes operations against the endpoint, serving queries from cache when fresh.

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::cache::{CacheKey, InvalidationPolicy, QueryCache, QuerySubscription};
use crate::credentials::CredentialStore;
use crate::error::Result;

use super::middleware::{AuthMiddleware, RequestDescriptor};
use super::operations::Operation;
use super::transport::Transport;
use super::types::{OperationKind, OperationRequest};

/// Client for the todo API. Clones share the same cache and transport.
#[derive(Clone)]
pub struct ApiClient {
    endpoint: Url,
    transport: Arc<dyn Transport>,
    middleware: AuthMiddleware,
    cache: QueryCache,
    policy: InvalidationPolicy,
}

impl ApiClient {
    /// Create a client with a fresh cache.
    pub fn new(
        endpoint: Url,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            endpoint,
            transport,
            middleware: AuthMiddleware::new(credentials),
            cache: QueryCache::new(),
            policy: InvalidationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InvalidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn policy(&self) -> &InvalidationPolicy {
        &self.policy
    }

    /// Watch a query name for invalidations.
    pub fn subscribe(&self, query: &str) -> QuerySubscription {
        self.cache.subscribe(query)
    }

    /// Run an operation and decode its result.
    ///
    /// Queries are answered from a fresh cache entry when one exists. Mutations always
    /// hit the network and apply the invalidation policy before returning.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        let variables = serde_json::to_value(operation)?;
        match O::KIND {
            OperationKind::Query => self.run_query::<O>(variables).await,
            OperationKind::Mutation => O::decode(self.run_mutation::<O>(variables).await?),
        }
    }

    async fn run_query<O: Operation>(&self, variables: Value) -> Result<O::Output> {
        let key = CacheKey::new(O::NAME, &variables);
        if let Some(entry) = self.cache.entry(&key).filter(|entry| !entry.stale) {
            tracing::debug!(
                operation = O::NAME,
                age_secs = entry.age().num_seconds(),
                "cache hit"
            );
            return O::decode(entry.data);
        }

        tracing::debug!(operation = O::NAME, "cache miss");
        let started = self.cache.epoch(O::NAME);
        let data = self.send::<O>(variables).await?;

        // A result that fails to decode is never cached
        let output = O::decode(data.clone())?;
        if !self.cache.store(key, data, started) {
            tracing::warn!(
                operation = O::NAME,
                "query invalidated while in flight, result not cached"
            );
        }
        Ok(output)
    }

    async fn run_mutation<O: Operation>(&self, variables: Value) -> Result<Value> {
        let data = match self.send::<O>(variables).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(operation = O::NAME, error = %e, "mutation failed");
                return Err(e);
            }
        };

        // Subscribers are notified before the caller sees the result
        self.policy.on_mutation_success(O::NAME, &self.cache);
        Ok(data)
    }

    async fn send<O: Operation>(&self, variables: Value) -> Result<Value> {
        let request = RequestDescriptor::new(
            self.endpoint.clone(),
            OperationRequest {
                query: O::DOCUMENT.to_string(),
                operation_name: O::OPERATION_NAME.to_string(),
                variables,
            },
        );
        let request = self.middleware.apply(&request)?;

        let response = self.transport.send(request).await?;
        response.into_data()
    }
}
