//! Maps domain errors to the notice the user sees and the process exit code.

use std::fmt;
use std::process::ExitCode;

use reviewhub_core::DomainError;
use reviewhub_shared::Notice;

/// Application-level error type that converts to a [`Notice`].
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Credentials(String),
    ReadOnly(String),
    Unreachable(String),
    SessionExpired,
    LoginRequired,
    Forbidden(String),
    Validation(String),
    Busy(String),
    /// Details are logged where the error is converted, never shown.
    Internal,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notice())
    }
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(match self {
            AppError::Internal => 1,
            AppError::Validation(_) | AppError::Busy(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::Credentials(_)
            | AppError::SessionExpired
            | AppError::LoginRequired
            | AppError::Forbidden(_) => 4,
            AppError::ReadOnly(_) => 5,
            AppError::Unreachable(_) => 6,
        })
    }

    pub fn notice(&self) -> Notice {
        match self {
            AppError::NotFound(detail) => Notice::not_found(detail),
            AppError::Credentials(detail) => Notice::inline("Login failed").with_detail(detail),
            AppError::ReadOnly(detail) => Notice::read_only(detail),
            AppError::Unreachable(detail) => {
                Notice::blocking("Could not reach the server").with_detail(detail)
            }
            AppError::SessionExpired => Notice::blocking("Session expired")
                .with_detail("Your session is no longer valid. Please log in again."),
            AppError::LoginRequired => {
                Notice::blocking("Login required").with_detail("Log in to write or edit.")
            }
            AppError::Forbidden(detail) => Notice::blocking("Not allowed").with_detail(detail),
            AppError::Validation(detail) => {
                Notice::inline("Please check your input").with_detail(detail)
            }
            AppError::Busy(detail) => Notice::inline("Please wait").with_detail(detail),
            AppError::Internal => Notice::blocking("Something went wrong"),
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(detail),
            DomainError::InvalidCredentials(_) => AppError::Credentials(detail),
            DomainError::ReadOnly(_) => AppError::ReadOnly(detail),
            DomainError::Network(_) | DomainError::Timeout => AppError::Unreachable(detail),
            DomainError::Unauthorized => AppError::SessionExpired,
            DomainError::LoginRequired => AppError::LoginRequired,
            DomainError::Forbidden(_) => AppError::Forbidden(detail),
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::MutationInFlight(_) => AppError::Busy(detail),
            DomainError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                AppError::Internal
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Failed to encode output: {}", err);
        AppError::Internal
    }
}

/// Result type alias for commands.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reviewhub_core::{CredentialError, WriteAction};
    use reviewhub_shared::Severity;

    #[test]
    fn test_read_only_is_blocking() {
        let err = AppError::from(DomainError::ReadOnly(WriteAction::CreateReview));
        let notice = err.notice();
        assert_eq!(notice.severity, Severity::Blocking);
        assert!(notice.detail.unwrap().starts_with("Writing a review is disabled"));
        assert_eq!(err.exit_code(), ExitCode::from(5));
    }

    #[test]
    fn test_login_failures_keep_their_message() {
        let unknown = AppError::from(DomainError::from(CredentialError::UnknownEmail)).notice();
        let wrong = AppError::from(DomainError::from(CredentialError::WrongPassword)).notice();
        assert_eq!(unknown.severity, Severity::Inline);
        assert_ne!(unknown.detail, wrong.detail);
    }

    #[test]
    fn test_internal_details_stay_in_logs() {
        let notice = AppError::from(DomainError::Internal("decode failed".into())).notice();
        assert_eq!(notice.detail, None);
    }

    #[test]
    fn test_unreachable_endpoint_exits_with_network_code() {
        for err in [DomainError::Timeout, DomainError::Network("refused".into())] {
            let err = AppError::from(err);
            assert!(matches!(err, AppError::Unreachable(_)));
            assert_eq!(err.exit_code(), ExitCode::from(6));
        }
    }
}
