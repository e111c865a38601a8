//! Mock email/password login against the source's user list.

use crate::domain::{User, mask_email};
use crate::error::{CredentialError, DomainError, DomainResult};
use crate::ports::{ReviewSource, TokenService};

/// Successful login: the public user and its session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Look the email up (first exact, case-sensitive match), compare the
/// plaintext password and issue a token.
pub async fn login(
    source: &dyn ReviewSource,
    tokens: &dyn TokenService,
    email: &str,
    password: &str,
) -> DomainResult<LoginOutcome> {
    let record = source
        .find_users_by_email(email)
        .await?
        .into_iter()
        .find(|u| u.email == email)
        .ok_or_else(|| {
            tracing::debug!(user_email = %mask_email(email), "No user with this email");
            CredentialError::UnknownEmail
        })?;

    if !record.password_matches(password) {
        tracing::debug!(user_id = %record.id, "Password mismatch");
        return Err(CredentialError::WrongPassword.into());
    }

    let user = record.into_public();
    let token = tokens
        .issue(&user)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(LoginOutcome { token, user })
}
