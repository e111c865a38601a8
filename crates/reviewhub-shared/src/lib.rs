//! # Reviewhub Shared
//!
//! Wire-level types shared by the binaries: the `db.json` dump layout and the
//! user-facing notice an error is rendered as.

pub mod dto;
pub mod response;

pub use dto::{DatabaseDump, DumpError};
pub use response::{Notice, Severity};
