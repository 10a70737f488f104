#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use tokio::sync::oneshot;
use url::Url;

use todolink::api::{OperationResponse, RequestDescriptor, Transport};
use todolink::{ApiClient, App, CredentialStore, Item, MemoryCredentialStore, TodoError};

pub const USERNAME: &str = "bob";
pub const PASSWORD: &str = "pass";

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation: String,
    pub authorization: Option<String>,
    pub variables: Value,
}

#[derive(Default)]
struct ServerState {
    items: Vec<Item>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    offline: bool,
    hold_list: Option<oneshot::Receiver<()>>,
    list_field: Option<String>,
}

/// In-process stand-in for the todo API.
#[derive(Default)]
pub struct FakeServer {
    state: Mutex<ServerState>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Hold the next ListItems response until the returned sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().hold_list = Some(rx);
        tx
    }

    /// Answer ListItems under a different field name than the document asks for.
    pub fn rename_list_field(&self, field: &str) {
        self.state.lock().list_field = Some(field.to_string());
    }

    fn token_user(authorization: Option<&str>) -> Option<String> {
        authorization
            .and_then(|value| value.strip_prefix("Bearer token-"))
            .map(str::to_string)
    }

    fn handle(
        &self,
        operation: &str,
        variables: &Value,
        authorization: Option<&str>,
    ) -> OperationResponse {
        let mut state = self.state.lock();
        match operation {
            "Login" => {
                if variables["username"] == USERNAME && variables["password"] == PASSWORD {
                    let token = format!("token-{}", USERNAME);
                    OperationResponse::with_data(json!({"login": {"token": token}}))
                } else {
                    OperationResponse::with_error("bad credentials")
                }
            }
            "Hello" => {
                let hello = match Self::token_user(authorization) {
                    Some(user) => format!("Hello {}", user),
                    None => "Hello stranger!".to_string(),
                };
                OperationResponse::with_data(json!({"hello": hello}))
            }
            "ListItems" => {
                let field = state.list_field.as_deref().unwrap_or("items").to_string();
                let mut data = Map::new();
                data.insert(field, json!(state.items));
                OperationResponse::with_data(Value::Object(data))
            }
            "CreateItem" => {
                let item = Item {
                    id: state.next_id,
                    text: variables["text"].as_str().unwrap_or_default().to_string(),
                };
                state.next_id += 1;
                state.items.push(item.clone());
                OperationResponse::with_data(json!({"createItem": {"item": item}}))
            }
            "UpdateItem" => {
                let id = variables["id"].as_i64().unwrap_or(-1);
                match state.items.iter_mut().find(|item| item.id == id) {
                    Some(item) => {
                        item.text = variables["text"].as_str().unwrap_or_default().to_string();
                        let item = item.clone();
                        OperationResponse::with_data(json!({"updateItem": {"item": item}}))
                    }
                    None => OperationResponse::with_error(format!("no item with id {}", id)),
                }
            }
            "DeleteItem" => {
                let id = variables["id"].as_i64().unwrap_or(-1);
                if state.items.iter().any(|item| item.id == id) {
                    state.items.retain(|item| item.id != id);
                    OperationResponse::with_data(json!({"deleteItem": {"ok": true}}))
                } else {
                    let mut response =
                        OperationResponse::with_error(format!("no item with id {}", id));
                    response.data = Some(json!({"deleteItem": null}));
                    response
                }
            }
            other => OperationResponse::with_error(format!("unknown operation {}", other)),
        }
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn send(&self, request: RequestDescriptor) -> todolink::Result<OperationResponse> {
        let operation = request.body.operation_name.clone();
        let authorization = request.authorization().map(str::to_string);

        let hold = {
            let mut state = self.state.lock();
            state.requests.push(RecordedRequest {
                operation: operation.clone(),
                authorization: authorization.clone(),
                variables: request.body.variables.clone(),
            });
            if state.offline {
                return Err(TodoError::Transport("connection refused".to_string()));
            }
            if operation == "ListItems" {
                state.hold_list.take()
            } else {
                None
            }
        };

        // Snapshot before waiting so a held response reflects request time
        let response = self.handle(
            &operation,
            &request.body.variables,
            authorization.as_deref(),
        );
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        Ok(response)
    }
}

pub fn endpoint() -> Url {
    Url::parse("http://localhost:5000/graphql").unwrap()
}

pub fn client_with(server: &Arc<FakeServer>, store: &Arc<MemoryCredentialStore>) -> ApiClient {
    let credentials: Arc<dyn CredentialStore> = store.clone();
    client_with_store(server, credentials)
}

pub fn client_with_store(
    server: &Arc<FakeServer>,
    credentials: Arc<dyn CredentialStore>,
) -> ApiClient {
    let transport: Arc<dyn Transport> = server.clone();
    ApiClient::new(endpoint(), transport, credentials)
}

pub fn app_with(server: &Arc<FakeServer>, store: &Arc<MemoryCredentialStore>) -> App {
    let credentials: Arc<dyn CredentialStore> = store.clone();
    app_with_store(server, credentials)
}

pub fn app_with_store(server: &Arc<FakeServer>, credentials: Arc<dyn CredentialStore>) -> App {
    App::new(client_with_store(server, credentials.clone()), credentials)
}
