//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// Result alias used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain errors - everything a caller of the data layer can observe.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{entity_type} with id {id} was not found")]
    NotFound { entity_type: &'static str, id: u64 },

    #[error(transparent)]
    InvalidCredentials(#[from] CredentialError),

    #[error("{0} is disabled in the read-only demo. Run against a live endpoint to try it.")]
    ReadOnly(WriteAction),

    #[error("Network error: {0}")]
    Network(String),

    #[error("The request timed out")]
    Timeout,

    #[error("Your session is no longer valid. Please log in again.")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("You need to log in first")]
    LoginRequired,

    #[error("Only the author can change this {0}")]
    Forbidden(&'static str),

    #[error("{0} is already in progress")]
    MutationInFlight(WriteAction),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn review_not_found(id: u64) -> Self {
        Self::NotFound {
            entity_type: "Review",
            id,
        }
    }

    pub fn comment_not_found(id: u64) -> Self {
        Self::NotFound {
            entity_type: "Comment",
            id,
        }
    }
}

/// Login failures. The two variants carry different user-facing messages.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No account is registered with this email")]
    UnknownEmail,

    #[error("The password is incorrect")]
    WrongPassword,
}

/// Write operations, named for read-only and in-flight messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteAction {
    CreateReview,
    UpdateReview,
    DeleteReview,
    CreateComment,
    UpdateComment,
    DeleteComment,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WriteAction::CreateReview => "Writing a review",
            WriteAction::UpdateReview => "Editing a review",
            WriteAction::DeleteReview => "Deleting a review",
            WriteAction::CreateComment => "Writing a comment",
            WriteAction::UpdateComment => "Editing a comment",
            WriteAction::DeleteComment => "Deleting a comment",
        };
        f.write_str(label)
    }
}
