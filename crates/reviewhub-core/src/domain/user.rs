use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::wire::UserId;

/// Public user profile - what callers get back after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub nickname: String,
}

/// User as stored by the data source, plaintext password included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub nickname: String,
    #[serde(default)]
    pub password: String,
}

impl UserRecord {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Drop the password.
    pub fn into_public(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            nickname: self.nickname,
        }
    }
}

/// Mask an email address for logging: `jane@example.com` -> `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

/// Nickname lookup used to label comment authors.
#[derive(Debug, Clone, Default)]
pub struct AuthorDirectory {
    nicknames: HashMap<UserId, String>,
}

impl AuthorDirectory {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            nicknames: users.into_iter().map(|u| (u.id, u.nickname)).collect(),
        }
    }

    pub fn nickname(&self, user_id: UserId) -> &str {
        self.nicknames
            .get(&user_id)
            .map(String::as_str)
            .unwrap_or(Self::UNKNOWN_AUTHOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_public_strips_password() {
        let record: UserRecord = serde_json::from_str(
            r#"{"id":"1","email":"a@b.c","username":"alice","nickname":"Al","password":"pw"}"#,
        )
        .unwrap();
        let user = record.into_public();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(user.id, UserId(1));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("j@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_author_directory_falls_back_for_unknown_users() {
        let directory = AuthorDirectory::new([User {
            id: UserId(1),
            email: "a@b.c".to_string(),
            username: "alice".to_string(),
            nickname: "Al".to_string(),
        }]);
        assert_eq!(directory.nickname(UserId(1)), "Al");
        assert_eq!(directory.nickname(UserId(2)), AuthorDirectory::UNKNOWN_AUTHOR);
    }
}
