//! Session token port.

use crate::domain::User;

/// Issues the opaque handle stored in the session after login.
pub trait TokenService: Send + Sync {
    /// Generate a token for a freshly authenticated user.
    fn issue(&self, user: &User) -> Result<String, AuthError>;
}

/// Token errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
