//! Live source backed by the collection endpoint.
//!
//! Category and comment lookups are pushed down as query-string filters.
//! Search and sort always run client-side. Every request carries the
//! session token; a 401/403 logs the session out. Updates and deletes read
//! the record first, so a missing one is reported as not found.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use reviewhub_core::domain::{
    Comment, CommentId, CommentPatch, NewComment, NewReview, Review, ReviewId, ReviewPatch,
    Stamped, User, UserRecord,
};
use reviewhub_core::ports::{
    Collection, HttpRequest, HttpResponse, Method, ReviewSource, SourceMode, Transport,
};
use reviewhub_core::query::{self, ReviewQuery, SortOrder};
use reviewhub_core::service::SessionStore;
use reviewhub_core::{DomainError, DomainResult};

pub struct RemoteSource {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl RemoteSource {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    async fn send(&self, request: HttpRequest) -> DomainResult<HttpResponse> {
        let request = request.with_bearer(self.session.token());
        let (method, path) = (request.method, request.path.clone());

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "Request failed");
            DomainError::from(e)
        })?;

        if response.is_auth_failure() {
            tracing::warn!(%method, %path, status = response.status, "Session rejected, logging out");
            if let Err(e) = self.session.logout().await {
                tracing::warn!(error = %e, "Failed to persist forced logout");
            }
            return Err(DomainError::Unauthorized);
        }

        tracing::debug!(%method, %path, status = response.status, "Response received");
        Ok(response)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: Option<(&str, String)>,
    ) -> DomainResult<Vec<T>> {
        let mut request = HttpRequest::get(collection.path());
        if let Some((field, value)) = filter {
            request = request.with_query(field, value);
        }
        let response = self.send(request).await?;
        decode(response, || {
            DomainError::Network(format!("collection {} not found", collection.path()))
        })
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: u64,
        missing: impl FnOnce() -> DomainError,
    ) -> DomainResult<T> {
        let response = self
            .send(HttpRequest::get(format!("{}/{id}", collection.path())))
            .await?;
        decode(response, missing)
    }

    async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: &B,
        missing: impl FnOnce() -> DomainError,
    ) -> DomainResult<T> {
        let body = serde_json::to_value(body).map_err(|e| DomainError::Internal(e.to_string()))?;
        let response = self.send(HttpRequest::new(method, path).with_body(body)).await?;
        decode(response, missing)
    }

    async fn remove(
        &self,
        collection: Collection,
        id: u64,
        missing: impl FnOnce() -> DomainError,
    ) -> DomainResult<()> {
        let response = self
            .send(HttpRequest::new(
                Method::Delete,
                format!("{}/{id}", collection.path()),
            ))
            .await?;
        check_status(&response, missing)
    }
}

fn check_status(response: &HttpResponse, missing: impl FnOnce() -> DomainError) -> DomainResult<()> {
    match response.status {
        404 => Err(missing()),
        status if !response.is_success() => Err(DomainError::Network(format!(
            "endpoint answered with status {status}"
        ))),
        _ => Ok(()),
    }
}

fn decode<T: DeserializeOwned>(
    response: HttpResponse,
    missing: impl FnOnce() -> DomainError,
) -> DomainResult<T> {
    check_status(&response, missing)?;
    serde_json::from_str(&response.body)
        .map_err(|e| DomainError::Internal(format!("unexpected response body: {e}")))
}

fn sorted(mut reviews: Vec<Review>, sort: Option<SortOrder>) -> Vec<Review> {
    if let Some(order) = sort {
        query::sort_reviews(&mut reviews, order);
    }
    reviews
}

#[async_trait]
impl ReviewSource for RemoteSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Live
    }

    async fn list_reviews(&self, sort: Option<SortOrder>) -> DomainResult<Vec<Review>> {
        let reviews = self.fetch_list(Collection::Reviews, None).await?;
        Ok(sorted(reviews, sort))
    }

    async fn list_reviews_by_category(
        &self,
        category: &str,
        sort: Option<SortOrder>,
    ) -> DomainResult<Vec<Review>> {
        let reviews = self
            .fetch_list(Collection::Reviews, Some(("category", category.to_string())))
            .await?;
        // the endpoint may ignore the filter
        let reviews = query::filter_by_category(reviews, category);
        Ok(sorted(reviews, sort))
    }

    async fn search_reviews(
        &self,
        query: &str,
        category: Option<&str>,
        sort: Option<SortOrder>,
    ) -> DomainResult<Vec<Review>> {
        let query = ReviewQuery {
            category: category.map(str::to_string),
            search: Some(query.to_string()),
            sort,
        }
        .normalized();

        let reviews = match &query.category {
            Some(category) => self.list_reviews_by_category(category, None).await?,
            None => self.list_reviews(None).await?,
        };
        Ok(query.apply(reviews))
    }

    async fn get_review(&self, id: ReviewId) -> DomainResult<Review> {
        self.fetch_one(Collection::Reviews, id.get(), || {
            DomainError::review_not_found(id.get())
        })
        .await
    }

    async fn create_review(&self, review: NewReview) -> DomainResult<Review> {
        let created: Review = self
            .write(
                Method::Post,
                Collection::Reviews.path(),
                &Stamped::at(review, Utc::now()),
                || DomainError::Network("collection /reviews not found".to_string()),
            )
            .await?;
        tracing::info!(review_id = %created.id, "Review created");
        Ok(created)
    }

    async fn update_review(&self, id: ReviewId, patch: ReviewPatch) -> DomainResult<Review> {
        let mut review = self.get_review(id).await?;
        review.apply(patch, Utc::now());

        let updated: Review = self
            .write(
                Method::Put,
                format!("{}/{id}", Collection::Reviews.path()),
                &review,
                || DomainError::review_not_found(id.get()),
            )
            .await?;
        tracing::info!(review_id = %id, "Review updated");
        Ok(updated)
    }

    async fn delete_review(&self, id: ReviewId) -> DomainResult<()> {
        self.get_review(id).await?;
        self.remove(Collection::Reviews, id.get(), || {
            DomainError::review_not_found(id.get())
        })
        .await?;
        tracing::info!(review_id = %id, "Review deleted");
        Ok(())
    }

    async fn list_comments(&self, review_id: ReviewId) -> DomainResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .fetch_list(Collection::Comments, Some(("reviewId", review_id.to_string())))
            .await?;
        comments.retain(|c| c.review_id == review_id);
        query::sort_comments_by_recency(&mut comments);
        Ok(comments)
    }

    async fn create_comment(&self, comment: NewComment) -> DomainResult<Comment> {
        let created: Comment = self
            .write(
                Method::Post,
                Collection::Comments.path(),
                &Stamped::at(comment, Utc::now()),
                || DomainError::Network("collection /comments not found".to_string()),
            )
            .await?;
        tracing::info!(comment_id = %created.id, review_id = %created.review_id, "Comment created");
        Ok(created)
    }

    async fn update_comment(&self, id: CommentId, patch: CommentPatch) -> DomainResult<Comment> {
        let mut comment: Comment = self
            .fetch_one(Collection::Comments, id.get(), || {
                DomainError::comment_not_found(id.get())
            })
            .await?;
        comment.apply(patch, Utc::now());

        let updated: Comment = self
            .write(
                Method::Put,
                format!("{}/{id}", Collection::Comments.path()),
                &comment,
                || DomainError::comment_not_found(id.get()),
            )
            .await?;
        tracing::info!(comment_id = %id, "Comment updated");
        Ok(updated)
    }

    async fn delete_comment(&self, id: CommentId) -> DomainResult<()> {
        self.fetch_one::<Comment>(Collection::Comments, id.get(), || {
            DomainError::comment_not_found(id.get())
        })
        .await?;
        self.remove(Collection::Comments, id.get(), || {
            DomainError::comment_not_found(id.get())
        })
        .await?;
        tracing::info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let records: Vec<UserRecord> = self.fetch_list(Collection::Users, None).await?;
        Ok(records.into_iter().map(UserRecord::into_public).collect())
    }

    async fn find_users_by_email(&self, email: &str) -> DomainResult<Vec<UserRecord>> {
        let mut records: Vec<UserRecord> = self
            .fetch_list(Collection::Users, Some(("email", email.to_string())))
            .await?;
        records.retain(|r| r.email == email);
        Ok(records)
    }
}
