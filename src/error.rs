// Error types for todolink.
// Separates transport failures from server-reported API errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Api(String),

    #[error("Credential cannot be sent as a header: {0}")]
    InvalidCredential(String),

    #[error("Route not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TodoError {
    /// Endpoint unreachable or the response could not be understood.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TodoError::Transport(_) | TodoError::MalformedResponse(_)
        )
    }

    /// The server executed the request and reported a failure.
    pub fn is_api(&self) -> bool {
        matches!(self, TodoError::Api(_))
    }
}

impl From<reqwest::Error> for TodoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TodoError::MalformedResponse(err.to_string())
        } else {
            TodoError::Transport(err.to_string())
        }
    }
}

impl From<config::ConfigError> for TodoError {
    fn from(err: config::ConfigError) -> Self {
        TodoError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
