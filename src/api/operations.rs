// Typed API operations.
// Each operation fixes its name, kind, document, argument shape, and result shape.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{Result, TodoError};

use super::types::{
    DeletePayload, HelloPayload, ItemPayload, ItemsPayload, LoginPayload, OperationKind,
};

/// A named query or mutation. The implementing struct serializes to its arguments.
pub trait Operation: Serialize {
    /// Name used on the wire and as the cache key prefix.
    const NAME: &'static str;
    const KIND: OperationKind;
    /// Operation name inside the document.
    const OPERATION_NAME: &'static str;
    const DOCUMENT: &'static str;
    /// Field of the response data holding the result, or None for the whole object.
    const RESULT_FIELD: Option<&'static str>;

    type Output: DeserializeOwned;

    /// Decode this operation's result from a response payload.
    fn decode(data: Value) -> Result<Self::Output> {
        let result = match Self::RESULT_FIELD {
            Some(field) => match data {
                Value::Object(mut fields) => fields.remove(field).unwrap_or(Value::Null),
                _ => Value::Null,
            },
            None => data,
        };

        if result.is_null() {
            return Err(TodoError::MalformedResponse(format!(
                "no result for {}",
                Self::NAME
            )));
        }
        serde_json::from_value(result).map_err(|e| {
            TodoError::MalformedResponse(format!("unexpected {} result: {}", Self::NAME, e))
        })
    }
}

/// Exchange username and password for a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

impl Operation for Login {
    const NAME: &'static str = "login";
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "Login";
    const DOCUMENT: &'static str = "mutation Login($username: String!, $password: String!) { \
         login(username: $username, password: $password) { token } }";
    const RESULT_FIELD: Option<&'static str> = Some("login");
    type Output = LoginPayload;
}

/// Unauthenticated diagnostic query. Greets the user the token belongs to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hello {}

impl Operation for Hello {
    const NAME: &'static str = "hello";
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "Hello";
    const DOCUMENT: &'static str = "query Hello { hello }";
    const RESULT_FIELD: Option<&'static str> = None;
    type Output = HelloPayload;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListItems {}

impl Operation for ListItems {
    const NAME: &'static str = "listItems";
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "ListItems";
    const DOCUMENT: &'static str = "query ListItems { items: listItems { id text } }";
    const RESULT_FIELD: Option<&'static str> = None;
    type Output = ItemsPayload;
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateItem {
    pub text: String,
}

impl Operation for CreateItem {
    const NAME: &'static str = "createItem";
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "CreateItem";
    const DOCUMENT: &'static str =
        "mutation CreateItem($text: String!) { createItem(text: $text) { item { id text } } }";
    const RESULT_FIELD: Option<&'static str> = Some("createItem");
    type Output = ItemPayload;
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateItem {
    pub id: i64,
    pub text: String,
}

impl Operation for UpdateItem {
    const NAME: &'static str = "updateItem";
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "UpdateItem";
    const DOCUMENT: &'static str = "mutation UpdateItem($id: Int!, $text: String!) { \
         updateItem(id: $id, text: $text) { item { id text } } }";
    const RESULT_FIELD: Option<&'static str> = Some("updateItem");
    type Output = ItemPayload;
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteItem {
    pub id: i64,
}

impl Operation for DeleteItem {
    const NAME: &'static str = "deleteItem";
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "DeleteItem";
    const DOCUMENT: &'static str = "mutation DeleteItem($id: Int!) { deleteItem(id: $id) { ok } }";
    const RESULT_FIELD: Option<&'static str> = Some("deleteItem");
    type Output = DeletePayload;
}
