//! HTTP transports.

mod memory;

#[cfg(feature = "http")]
mod reqwest;

pub use memory::InMemoryTransport;

#[cfg(feature = "http")]
pub use self::reqwest::{HttpConfig, ReqwestTransport};
