// Request middleware.
// Attaches the stored bearer credential to every outgoing request.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use crate::credentials::CredentialStore;
use crate::error::{Result, TodoError};

use super::types::OperationRequest;

/// Everything needed to send one operation.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub endpoint: Url,
    pub headers: HeaderMap,
    pub body: OperationRequest,
}

impl RequestDescriptor {
    pub fn new(endpoint: Url, body: OperationRequest) -> Self {
        Self {
            endpoint,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// The `authorization` header, if set.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// Reads the credential store and injects `authorization: Bearer <token>`.
#[derive(Clone)]
pub struct AuthMiddleware {
    credentials: Arc<dyn CredentialStore>,
}

impl AuthMiddleware {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Produce an augmented copy of `request`. The original is left untouched.
    ///
    /// Without a credential the header is omitted, and any stale one is removed.
    /// A store read failure aborts the send.
    pub fn apply(&self, request: &RequestDescriptor) -> Result<RequestDescriptor> {
        let mut augmented = request.clone();

        match self.credentials.get()? {
            Some(credential) => {
                let mut value = HeaderValue::from_str(&credential.bearer())
                    .map_err(|e| TodoError::InvalidCredential(e.to_string()))?;
                value.set_sensitive(true);
                augmented.headers.insert(AUTHORIZATION, value);
                tracing::debug!(
                    operation = %request.body.operation_name,
                    "attached bearer credential"
                );
            }
            None => {
                augmented.headers.remove(AUTHORIZATION);
            }
        }

        Ok(augmented)
    }
}
