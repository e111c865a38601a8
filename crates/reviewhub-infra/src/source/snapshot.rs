//! Read-only source over pre-generated JSON documents.
//!
//! Each collection is one document (`reviews.json`, `users.json`,
//! `comments.json`) holding the full array. Reads load the document and run
//! the query pipeline in memory; writes fail immediately.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use reviewhub_core::domain::{
    Comment, CommentId, CommentPatch, NewComment, NewReview, Review, ReviewId, ReviewPatch, User,
    UserRecord,
};
use reviewhub_core::ports::{Collection, HttpRequest, ReviewSource, SourceMode, Transport};
use reviewhub_core::query::{self, ReviewQuery, SortOrder};
use reviewhub_core::{DomainError, DomainResult, WriteAction};

/// Fetches the raw text of one snapshot document.
#[async_trait]
pub trait SnapshotLoader: Send + Sync {
    async fn load(&self, collection: Collection) -> DomainResult<String>;
}

/// Documents served as static files next to the client.
pub struct HttpSnapshotLoader {
    transport: Arc<dyn Transport>,
}

impl HttpSnapshotLoader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SnapshotLoader for HttpSnapshotLoader {
    async fn load(&self, collection: Collection) -> DomainResult<String> {
        let path = format!("/{}", collection.snapshot_file());
        let response = self.transport.send(HttpRequest::get(&path)).await?;
        if !response.is_success() {
            return Err(DomainError::Network(format!(
                "snapshot document {path} answered with status {}",
                response.status
            )));
        }
        Ok(response.body)
    }
}

/// Documents read from a local directory.
pub struct DirSnapshotLoader {
    dir: PathBuf,
}

impl DirSnapshotLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SnapshotLoader for DirSnapshotLoader {
    async fn load(&self, collection: Collection) -> DomainResult<String> {
        let path = self.dir.join(collection.snapshot_file());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DomainError::Network(format!("{}: {e}", path.display())))
    }
}

pub struct SnapshotSource {
    loader: Arc<dyn SnapshotLoader>,
}

impl SnapshotSource {
    pub fn new(loader: Arc<dyn SnapshotLoader>) -> Self {
        Self { loader }
    }

    async fn documents<T: DeserializeOwned>(&self, collection: Collection) -> DomainResult<Vec<T>> {
        let raw = self.loader.load(collection).await?;
        let records: Vec<T> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::Internal(format!("malformed {}: {e}", collection.snapshot_file()))
        })?;
        tracing::debug!(collection = collection.name(), count = records.len(), "Snapshot loaded");
        Ok(records)
    }

    fn read_only<T>(action: WriteAction) -> DomainResult<T> {
        tracing::warn!(?action, "Rejected write against read-only snapshot");
        Err(DomainError::ReadOnly(action))
    }
}

#[async_trait]
impl ReviewSource for SnapshotSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Snapshot
    }

    async fn list_reviews(&self, sort: Option<SortOrder>) -> DomainResult<Vec<Review>> {
        let reviews = self.documents(Collection::Reviews).await?;
        Ok(ReviewQuery { sort, ..ReviewQuery::all() }.apply(reviews))
    }

    async fn list_reviews_by_category(
        &self,
        category: &str,
        sort: Option<SortOrder>,
    ) -> DomainResult<Vec<Review>> {
        let reviews = self.documents(Collection::Reviews).await?;
        let mut reviews = query::filter_by_category(reviews, category);
        if let Some(order) = sort {
            query::sort_reviews(&mut reviews, order);
        }
        Ok(reviews)
    }

    async fn search_reviews(
        &self,
        query: &str,
        category: Option<&str>,
        sort: Option<SortOrder>,
    ) -> DomainResult<Vec<Review>> {
        let reviews = self.documents(Collection::Reviews).await?;
        let query = ReviewQuery {
            category: category.map(str::to_string),
            search: Some(query.to_string()),
            sort,
        };
        Ok(query.apply(reviews))
    }

    async fn get_review(&self, id: ReviewId) -> DomainResult<Review> {
        self.documents::<Review>(Collection::Reviews)
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::review_not_found(id.get()))
    }

    async fn create_review(&self, _review: NewReview) -> DomainResult<Review> {
        Self::read_only(WriteAction::CreateReview)
    }

    async fn update_review(&self, _id: ReviewId, _patch: ReviewPatch) -> DomainResult<Review> {
        Self::read_only(WriteAction::UpdateReview)
    }

    async fn delete_review(&self, _id: ReviewId) -> DomainResult<()> {
        Self::read_only(WriteAction::DeleteReview)
    }

    async fn list_comments(&self, review_id: ReviewId) -> DomainResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self.documents(Collection::Comments).await?;
        comments.retain(|c| c.review_id == review_id);
        query::sort_comments_by_recency(&mut comments);
        Ok(comments)
    }

    async fn create_comment(&self, _comment: NewComment) -> DomainResult<Comment> {
        Self::read_only(WriteAction::CreateComment)
    }

    async fn update_comment(&self, _id: CommentId, _patch: CommentPatch) -> DomainResult<Comment> {
        Self::read_only(WriteAction::UpdateComment)
    }

    async fn delete_comment(&self, _id: CommentId) -> DomainResult<()> {
        Self::read_only(WriteAction::DeleteComment)
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let records: Vec<UserRecord> = self.documents(Collection::Users).await?;
        Ok(records.into_iter().map(UserRecord::into_public).collect())
    }

    async fn find_users_by_email(&self, email: &str) -> DomainResult<Vec<UserRecord>> {
        let mut records: Vec<UserRecord> = self.documents(Collection::Users).await?;
        records.retain(|r| r.email == email);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::InMemoryTransport;
    use crate::source::fixtures;
    use reviewhub_core::domain::{Category, Rating, UserId};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves the fixtures and counts loads.
    #[derive(Default)]
    struct FixtureLoader {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl SnapshotLoader for FixtureLoader {
        async fn load(&self, collection: Collection) -> DomainResult<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let records = match collection {
                Collection::Reviews => fixtures::reviews(),
                Collection::Users => fixtures::users(),
                Collection::Comments => fixtures::comments(),
            };
            Ok(Value::Array(records).to_string())
        }
    }

    fn source() -> (Arc<FixtureLoader>, SnapshotSource) {
        let loader = Arc::new(FixtureLoader::default());
        (loader.clone(), SnapshotSource::new(loader))
    }

    fn ids(reviews: &[Review]) -> Vec<u64> {
        reviews.iter().map(|r| r.id.get()).collect()
    }

    #[tokio::test]
    async fn test_reads_match_live_semantics() {
        let (_, source) = source();
        assert_eq!(source.mode(), SourceMode::Snapshot);
        assert_eq!(
            ids(&source.list_reviews(Some(SortOrder::Latest)).await.unwrap()),
            vec![1, 3, 2]
        );
        assert_eq!(
            ids(&source.list_reviews_by_category("food", None).await.unwrap()),
            vec![1, 3]
        );
        assert_eq!(
            ids(&source.search_reviews("ramen", Some("food"), Some(SortOrder::RatingLow)).await.unwrap()),
            vec![1, 3]
        );
    }

    #[tokio::test]
    async fn test_string_ids_in_documents() {
        let (_, source) = source();
        let review = source.get_review(ReviewId(3)).await.unwrap();
        assert_eq!(review.user_id, UserId(1));
        assert_eq!(
            source.get_review(ReviewId(9)).await.unwrap_err(),
            DomainError::review_not_found(9)
        );
    }

    #[tokio::test]
    async fn test_writes_fail_without_loading() {
        let (loader, source) = source();
        let draft = NewReview {
            user_id: UserId(1),
            title: "t".to_string(),
            content: "c".to_string(),
            category: Category::Items,
            rating: Rating::new(3).unwrap(),
            images: vec![],
            tags: vec![],
        };

        assert_eq!(
            source.create_review(draft).await.unwrap_err(),
            DomainError::ReadOnly(WriteAction::CreateReview)
        );
        assert_eq!(
            source.delete_comment(CommentId(1)).await.unwrap_err(),
            DomainError::ReadOnly(WriteAction::DeleteComment)
        );
        assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comments_and_users() {
        let (_, source) = source();
        let comments = source.list_comments(ReviewId(1)).await.unwrap();
        assert_eq!(comments.iter().map(|c| c.id.get()).collect::<Vec<_>>(), vec![2, 1]);

        let found = source.find_users_by_email("other@example.com").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nickname, "Otto");
    }

    #[tokio::test]
    async fn test_http_loader_reads_static_documents() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.seed("reviews", fixtures::reviews()).await;
        let source = SnapshotSource::new(Arc::new(HttpSnapshotLoader::new(transport.clone())));

        assert_eq!(source.list_reviews(None).await.unwrap().len(), 3);
        assert!(matches!(
            source.list_users().await.unwrap_err(),
            DomainError::Network(_)
        ));
    }

    #[tokio::test]
    async fn test_dir_loader() {
        let dir = tempfile::tempdir().unwrap();
        let body = Value::Array(fixtures::comments()).to_string();
        tokio::fs::write(dir.path().join("comments.json"), body).await.unwrap();
        let source = SnapshotSource::new(Arc::new(DirSnapshotLoader::new(dir.path())));

        assert_eq!(source.list_comments(ReviewId(2)).await.unwrap().len(), 1);
        assert!(source.list_reviews(None).await.is_err());
    }
}
