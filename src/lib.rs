// todolink library.
// Authenticated, cached access to a todo-list query/mutation API.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod state;

pub use api::{ApiClient, Item};
pub use app::App;
pub use credentials::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{Result, TodoError};
