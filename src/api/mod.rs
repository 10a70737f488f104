// Todo API module.
// Provides the client, request middleware, transport, and wire types.

pub mod client;
pub mod endpoints;
pub mod middleware;
pub mod operations;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use middleware::{AuthMiddleware, RequestDescriptor};
pub use operations::Operation;
pub use transport::{HttpTransport, Transport};
pub use types::*;
