// API wire types.
// Request envelope, response envelope, and the result shapes of each operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TodoError};

/// Whether an operation may be served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A todo item. Identity is the server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub text: String,
}

/// Result of `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub token: String,
}

/// Result of `hello`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    pub hello: String,
}

/// Result of `listItems`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsPayload {
    pub items: Vec<Item>,
}

/// Result of `createItem` and `updateItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub item: Item,
}

/// Result of `deleteItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    pub ok: bool,
}

/// Body posted to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub query: String,
    pub operation_name: String,
    pub variables: Value,
}

/// Error entry reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    pub message: String,
}

/// Body returned by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<ServerError>,
}

impl OperationResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![ServerError {
                message: message.into(),
            }],
        }
    }

    /// Payload on success, `Api` when the server reported errors.
    pub fn into_data(self) -> Result<Value> {
        if !self.errors.is_empty() {
            let message = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TodoError::Api(message));
        }

        match self.data {
            Some(Value::Null) | None => Err(TodoError::MalformedResponse(
                "response carries neither data nor errors".to_string(),
            )),
            Some(data) => Ok(data),
        }
    }
}
