// Transport layer.
// Sends a prepared request to the endpoint and returns the decoded envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Result, TodoError};

use super::middleware::RequestDescriptor;
use super::types::OperationResponse;

const USER_AGENT_VALUE: &str = concat!("todolink/", env!("CARGO_PKG_VERSION"));

/// Moves one request over the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `request`. Server-reported errors come back inside the envelope.
    async fn send(&self, request: RequestDescriptor) -> Result<OperationResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = client_builder(timeout).build()?;
        Ok(Self { client })
    }
}

fn client_builder(timeout: Duration) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    Client::builder().default_headers(headers).timeout(timeout)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<OperationResponse> {
        let response = self
            .client
            .post(request.endpoint)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        parse_response(status, &body)
    }
}

/// Decode a response body.
///
/// Servers report operation errors with a 4xx status and an envelope body, so the
/// envelope is preferred over the status code whenever it parses.
pub fn parse_response(status: StatusCode, body: &[u8]) -> Result<OperationResponse> {
    match serde_json::from_slice::<OperationResponse>(body) {
        Ok(envelope) if envelope.data.is_some() || !envelope.errors.is_empty() => Ok(envelope),
        _ if !status.is_success() => Err(TodoError::Transport(format!(
            "HTTP {}: {}",
            status,
            String::from_utf8_lossy(body)
        ))),
        Ok(envelope) => Ok(envelope),
        Err(e) => Err(TodoError::MalformedResponse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::OperationRequest;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    /// Whether `raw` holds the full head and body of one HTTP request.
    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw).to_ascii_lowercase();
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= head_end + 4 + length
    }

    /// Accept one connection, answer it with `body`, and return the raw request.
    async fn serve_once(listener: TcpListener, body: String) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        while !request_complete(&raw) {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[test]
    fn test_success_envelope() {
        let body = json!({"data": {"hello": "Hello stranger!"}}).to_string();
        let envelope = parse_response(StatusCode::OK, body.as_bytes()).unwrap();
        assert_eq!(
            envelope.into_data().unwrap(),
            json!({"hello": "Hello stranger!"})
        );
    }

    #[test]
    fn test_error_envelope_with_bad_status() {
        let body = json!({"errors": [{"message": "bad credentials"}]}).to_string();
        let envelope = parse_response(StatusCode::BAD_REQUEST, body.as_bytes()).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(err.is_api());
        assert_eq!(err.to_string(), "bad credentials");
    }

    #[test]
    fn test_non_envelope_error_status() {
        let err = parse_response(StatusCode::BAD_GATEWAY, b"<html>upstream down</html>")
            .unwrap_err();
        assert!(matches!(err, TodoError::Transport(_)));
    }

    #[test]
    fn test_garbage_body() {
        let err = parse_response(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, TodoError::MalformedResponse(_)));
    }

    #[test]
    fn test_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_headers_reach_the_wire() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = json!({"data": {"hello": "Hello bob"}}).to_string();
        let server = tokio::spawn(serve_once(listener, body));

        let mut request = RequestDescriptor::new(
            Url::parse(&format!("http://{}/graphql", addr)).unwrap(),
            OperationRequest {
                query: "query Hello { hello }".to_string(),
                operation_name: "Hello".to_string(),
                variables: json!({}),
            },
        );
        request
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer T0k3n"));

        // Loopback only, whatever proxy the environment configures
        let client = client_builder(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        let envelope = HttpTransport { client }.send(request).await.unwrap();
        assert_eq!(envelope.into_data().unwrap(), json!({"hello": "Hello bob"}));

        let raw = server.await.unwrap();
        let lines: Vec<String> = raw.lines().map(str::to_ascii_lowercase).collect();
        assert!(lines.contains(&"authorization: bearer t0k3n".to_string()));
        assert!(lines.contains(&"accept: application/json".to_string()));
        assert!(raw.contains(r#""operationName":"Hello""#));
    }
}
