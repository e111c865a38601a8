//! Opaque session token: base64 of `{"userId", "email", "timestamp"}`.
//!
//! The token is not signed and never expires. It only identifies the session
//! to the endpoint; do not treat it as a credential.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde::Serialize;

use reviewhub_core::domain::{User, UserId};
use reviewhub_core::ports::{AuthError, TokenService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    user_id: UserId,
    email: String,
    timestamp: i64, // ms since epoch
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueTokenService;

impl OpaqueTokenService {
    pub fn new() -> Self {
        Self
    }
}

impl TokenService for OpaqueTokenService {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let payload = Payload {
            user_id: user.id,
            email: user.email.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let json = serde_json::to_vec(&payload).map_err(|e| AuthError::Encoding(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }
}
