//! Session storage implementations.

mod file;
mod memory;

pub use file::FileSessionStorage;
pub use memory::InMemorySessionStorage;
