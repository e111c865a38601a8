//! Session token implementation.

mod token;

pub use token::OpaqueTokenService;
