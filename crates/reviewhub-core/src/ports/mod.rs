//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod source;
mod storage;
mod transport;

pub use auth::{AuthError, TokenService};
pub use cache::{Cache, CacheError};
pub use source::{Collection, ReviewSource, SourceMode};
pub use storage::{SessionStorage, StorageError};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
