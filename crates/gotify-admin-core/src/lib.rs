//! gotify-admin core library
//!
//! Shared functionality for the gotify-admin console:
//! - Persisted session (token + client identity)
//! - Request client with token injection and error classification
//! - Resource services for applications, clients, users and messages
//! - Common error types and tracing setup

pub mod error;
pub mod models;
pub mod request;
pub mod services;
pub mod session;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod tracing_init;
pub mod transport;

pub use error::{Error, Result};
pub use request::{ClientConfig, DEFAULT_CLIENT_NAME, RequestClient};
pub use session::{ClientIdentity, FileStorage, MemoryStorage, SessionStorage, SessionStore};
pub use transport::{FilePart, ReqwestTransport, Transport};
