use serde::{Deserialize, Serialize};

use super::user::User;
use super::wire::UserId;

/// The currently authenticated user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_logged_in: bool,
}

impl Session {
    pub fn logged_in(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_logged_in: true,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }
}

/// Storage envelope: `{"state": {...}, "version": 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: Session,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    pub const VERSION: u32 = 0;

    pub fn new(state: Session) -> Self {
        Self {
            state,
            version: Self::VERSION,
        }
    }
}
