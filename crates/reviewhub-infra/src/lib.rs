//! # Reviewhub Infrastructure
//!
//! Concrete implementations of the ports defined in `reviewhub-core`:
//! the live and snapshot data sources, HTTP transports, the query cache,
//! session token issuing and durable session storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory adapters only
//! - `http` - reqwest-backed HTTP transport
//! - `auth` - base64 session token service

pub mod cache;
pub mod http;
pub mod source;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use http::InMemoryTransport;
pub use storage::{FileSessionStorage, InMemorySessionStorage};

// Re-exports - sources
pub use source::{DirSnapshotLoader, HttpSnapshotLoader, RemoteSource, SnapshotLoader, SnapshotSource};

#[cfg(feature = "auth")]
pub use auth::OpaqueTokenService;

#[cfg(feature = "http")]
pub use http::{HttpConfig, ReqwestTransport};
