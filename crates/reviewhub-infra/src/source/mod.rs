//! The two [`ReviewSource`](reviewhub_core::ports::ReviewSource) backends.
//!
//! Exactly one is chosen at startup: [`RemoteSource`] for the live,
//! writable endpoint, or [`SnapshotSource`] for the read-only documents.

mod remote;
mod snapshot;

pub use remote::RemoteSource;
pub use snapshot::{DirSnapshotLoader, HttpSnapshotLoader, SnapshotLoader, SnapshotSource};
