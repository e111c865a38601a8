//! Data access port - the contract both deployment modes implement.

use async_trait::async_trait;

use crate::domain::{
    Comment, CommentId, CommentPatch, NewComment, NewReview, Review, ReviewId, ReviewPatch, User,
    UserRecord,
};
use crate::error::DomainResult;
use crate::query::SortOrder;

/// Which backend a source talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Mutable remote collection endpoint.
    Live,
    /// Pre-generated, read-only JSON documents.
    Snapshot,
}

/// The three collections exposed by either backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Reviews,
    Users,
    Comments,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Reviews, Collection::Users, Collection::Comments];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Reviews => "reviews",
            Collection::Users => "users",
            Collection::Comments => "comments",
        }
    }

    /// Resource path on the live endpoint, e.g. `/reviews`.
    pub fn path(self) -> String {
        format!("/{}", self.name())
    }

    /// File name of the snapshot document, e.g. `reviews.json`.
    pub fn snapshot_file(self) -> String {
        format!("{}.json", self.name())
    }
}

/// Review/comment/user data access.
///
/// Reads apply the query pipeline (category -> search -> sort) before
/// returning. Writes return [`DomainError::ReadOnly`](crate::DomainError::ReadOnly)
/// on snapshot sources. Ownership is not checked here.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    fn mode(&self) -> SourceMode;

    async fn list_reviews(&self, sort: Option<SortOrder>) -> DomainResult<Vec<Review>>;

    async fn list_reviews_by_category(
        &self,
        category: &str,
        sort: Option<SortOrder>,
    ) -> DomainResult<Vec<Review>>;

    /// Blank queries degrade to [`list_reviews_by_category`](Self::list_reviews_by_category)
    /// or [`list_reviews`](Self::list_reviews).
    async fn search_reviews(
        &self,
        query: &str,
        category: Option<&str>,
        sort: Option<SortOrder>,
    ) -> DomainResult<Vec<Review>>;

    async fn get_review(&self, id: ReviewId) -> DomainResult<Review>;

    async fn create_review(&self, review: NewReview) -> DomainResult<Review>;

    async fn update_review(&self, id: ReviewId, patch: ReviewPatch) -> DomainResult<Review>;

    async fn delete_review(&self, id: ReviewId) -> DomainResult<()>;

    /// Newest first.
    async fn list_comments(&self, review_id: ReviewId) -> DomainResult<Vec<Comment>>;

    async fn create_comment(&self, comment: NewComment) -> DomainResult<Comment>;

    async fn update_comment(&self, id: CommentId, patch: CommentPatch) -> DomainResult<Comment>;

    async fn delete_comment(&self, id: CommentId) -> DomainResult<()>;

    /// All users, passwords stripped.
    async fn list_users(&self) -> DomainResult<Vec<User>>;

    /// Raw user records whose email matches exactly, in source order.
    async fn find_users_by_email(&self, email: &str) -> DomainResult<Vec<UserRecord>>;
}
