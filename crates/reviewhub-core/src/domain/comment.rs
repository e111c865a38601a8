use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{CommentId, ReviewId, UserId, timestamp};
use crate::error::{DomainError, DomainResult};

/// Comment entity, attached to a review through `review_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Same merge rules as [`Review::apply`](super::Review::apply).
    pub fn apply(&mut self, patch: CommentPatch, now: DateTime<Utc>) {
        self.content = patch.content;
        self.updated_at = now.max(self.created_at);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub content: String,
}

impl NewComment {
    pub fn normalized(mut self) -> Self {
        self.content = self.content.trim().to_string();
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_content(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentPatch {
    pub content: String,
}

impl CommentPatch {
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_content(&self.content)
    }
}

fn require_content(content: &str) -> DomainResult<()> {
    if content.trim().is_empty() {
        Err(DomainError::Validation(
            "comment content is required".to_string(),
        ))
    } else {
        Ok(())
    }
}
