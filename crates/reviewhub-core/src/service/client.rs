//! Cache-aware facade the UI talks to.
//!
//! Reads go through the query cache keyed by [`QueryKey`]. Writes are gated
//! (login, ownership, validation), tracked by [`MutationTracker`], and on
//! success invalidate whatever [`INVALIDATION_TABLE`](super::INVALIDATION_TABLE)
//! says depends on them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::auth::{self, LoginOutcome};
use super::invalidation::{Invalidation, QueryKey};
use super::mutation::{MutationOutcome, MutationStatus, MutationTracker, Route};
use super::session::SessionStore;
use crate::domain::{
    AuthorDirectory, Comment, CommentId, CommentPatch, NewComment, NewReview, Review, ReviewId,
    ReviewPatch, UserId, mask_email,
};
use crate::error::{DomainError, DomainResult, WriteAction};
use crate::ports::{Cache, ReviewSource, SourceMode, TokenService};
use crate::query::ReviewQuery;

pub struct ReviewClient {
    source: Arc<dyn ReviewSource>,
    cache: Arc<dyn Cache>,
    session: Arc<SessionStore>,
    tokens: Arc<dyn TokenService>,
    mutations: MutationTracker,
    cache_ttl: Option<Duration>,
}

impl ReviewClient {
    pub fn new(
        source: Arc<dyn ReviewSource>,
        cache: Arc<dyn Cache>,
        session: Arc<SessionStore>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            source,
            cache,
            session,
            tokens,
            mutations: MutationTracker::new(),
            cache_ttl: None,
        }
    }

    /// Expire cached results after `ttl` even without an invalidation.
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn mode(&self) -> SourceMode {
        self.source.mode()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn mutation_status(&self, action: WriteAction) -> MutationStatus {
        self.mutations.status(action)
    }

    // ---- queries -------------------------------------------------------

    pub async fn reviews(&self, query: &ReviewQuery) -> DomainResult<Vec<Review>> {
        let query = query.normalized();
        let key = QueryKey::Reviews(query.clone());
        let fetch = async {
            match (&query.search, &query.category) {
                (Some(term), category) => {
                    self.source
                        .search_reviews(term, category.as_deref(), query.sort)
                        .await
                }
                (None, Some(category)) => {
                    self.source
                        .list_reviews_by_category(category, query.sort)
                        .await
                }
                (None, None) => self.source.list_reviews(query.sort).await,
            }
        };
        self.cached(key, fetch).await
    }

    pub async fn review(&self, id: ReviewId) -> DomainResult<Review> {
        self.cached(QueryKey::Review(id), self.source.get_review(id))
            .await
    }

    /// Route parameters arrive as strings.
    pub async fn review_by_param(&self, raw_id: &str) -> DomainResult<Review> {
        self.review(raw_id.parse()?).await
    }

    pub async fn comments(&self, review_id: ReviewId) -> DomainResult<Vec<Comment>> {
        self.cached(
            QueryKey::Comments(review_id),
            self.source.list_comments(review_id),
        )
        .await
    }

    pub async fn authors(&self) -> DomainResult<AuthorDirectory> {
        let users = self
            .cached(QueryKey::Users, self.source.list_users())
            .await?;
        Ok(AuthorDirectory::new(users))
    }

    // ---- session -------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginOutcome> {
        let outcome = auth::login(&*self.source, &*self.tokens, email, password).await?;
        self.session
            .login(outcome.user.clone(), outcome.token.clone())
            .await?;
        tracing::info!(user_email = %mask_email(email), user_id = %outcome.user.id, "Logged in");
        Ok(outcome)
    }

    pub async fn logout(&self) -> DomainResult<()> {
        self.session.logout().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    // ---- mutations -----------------------------------------------------

    /// The author is always the logged-in user, whatever `draft.user_id` says.
    pub async fn create_review(&self, draft: NewReview) -> DomainResult<MutationOutcome<Review>> {
        let action = WriteAction::CreateReview;
        let user_id = self.require_login()?;
        let draft = NewReview { user_id, ..draft }.normalized();
        draft.validate()?;

        let created = self.mutate(action, self.source.create_review(draft)).await?;
        self.invalidate(action, created.id).await;
        Ok(MutationOutcome {
            value: created,
            navigate_to: Route::ReviewList,
        })
    }

    pub async fn update_review(
        &self,
        id: ReviewId,
        patch: ReviewPatch,
    ) -> DomainResult<MutationOutcome<Review>> {
        let action = WriteAction::UpdateReview;
        self.require_review_owner(id).await?;
        let patch = patch.normalized();
        patch.validate()?;

        let updated = self.mutate(action, self.source.update_review(id, patch)).await?;
        self.invalidate(action, id).await;
        Ok(MutationOutcome {
            value: updated,
            navigate_to: Route::ReviewDetail(id),
        })
    }

    /// Comments of the review are left in place.
    pub async fn delete_review(&self, id: ReviewId) -> DomainResult<MutationOutcome<()>> {
        let action = WriteAction::DeleteReview;
        self.require_review_owner(id).await?;

        self.mutate(action, self.source.delete_review(id)).await?;
        self.invalidate(action, id).await;
        Ok(MutationOutcome {
            value: (),
            navigate_to: Route::ReviewList,
        })
    }

    pub async fn create_comment(
        &self,
        review_id: ReviewId,
        content: &str,
    ) -> DomainResult<MutationOutcome<Comment>> {
        let action = WriteAction::CreateComment;
        let user_id = self.require_login()?;
        let draft = NewComment {
            review_id,
            user_id,
            content: content.to_string(),
        }
        .normalized();
        draft.validate()?;

        let created = self.mutate(action, self.source.create_comment(draft)).await?;
        self.invalidate(action, review_id).await;
        Ok(MutationOutcome {
            value: created,
            navigate_to: Route::ReviewDetail(review_id),
        })
    }

    pub async fn update_comment(
        &self,
        review_id: ReviewId,
        id: CommentId,
        content: &str,
    ) -> DomainResult<MutationOutcome<Comment>> {
        let action = WriteAction::UpdateComment;
        self.require_comment_owner(review_id, id).await?;
        let patch = CommentPatch {
            content: content.to_string(),
        }
        .normalized();
        patch.validate()?;

        let updated = self.mutate(action, self.source.update_comment(id, patch)).await?;
        self.invalidate(action, review_id).await;
        Ok(MutationOutcome {
            value: updated,
            navigate_to: Route::ReviewDetail(review_id),
        })
    }

    pub async fn delete_comment(
        &self,
        review_id: ReviewId,
        id: CommentId,
    ) -> DomainResult<MutationOutcome<()>> {
        let action = WriteAction::DeleteComment;
        self.require_comment_owner(review_id, id).await?;

        self.mutate(action, self.source.delete_comment(id)).await?;
        self.invalidate(action, review_id).await;
        Ok(MutationOutcome {
            value: (),
            navigate_to: Route::ReviewDetail(review_id),
        })
    }

    // ---- internals -----------------------------------------------------

    async fn cached<T, F>(&self, key: QueryKey, fetch: F) -> DomainResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = DomainResult<T>>,
    {
        let cache_key = key.cache_key();
        if let Some(raw) = self.cache.get(&cache_key).await {
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    tracing::debug!(key = %cache_key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %cache_key, error = %e, "Dropping unreadable cache entry")
                }
            }
        }

        let value = fetch.await?;
        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&cache_key, &raw, self.cache_ttl).await {
                    tracing::warn!(key = %cache_key, error = %e, "Failed to cache query result");
                }
            }
            Err(e) => tracing::warn!(key = %cache_key, error = %e, "Query result not cacheable"),
        }
        Ok(value)
    }

    /// `idle -> pending -> idle`; failures are logged and handed back for the alert.
    async fn mutate<T, F>(&self, action: WriteAction, call: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        let _pending = self.mutations.begin(action)?;
        match call.await {
            Ok(value) => {
                tracing::debug!(?action, "Mutation succeeded");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(?action, error = %e, "Mutation failed");
                Err(e)
            }
        }
    }

    async fn invalidate(&self, action: WriteAction, review_id: ReviewId) {
        for invalidation in Invalidation::for_write(action, review_id) {
            let result = match &invalidation {
                Invalidation::Family(family) => self.cache.delete_prefix(family.prefix()).await,
                Invalidation::Key(key) => self.cache.delete(&key.cache_key()).await.map(|()| 1),
            };
            match result {
                Ok(removed) => {
                    tracing::debug!(?invalidation, removed, "Invalidated cached queries")
                }
                Err(e) => tracing::warn!(?invalidation, error = %e, "Cache invalidation failed"),
            }
        }
    }

    fn require_login(&self) -> DomainResult<UserId> {
        self.session.user_id().ok_or(DomainError::LoginRequired)
    }

    async fn require_review_owner(&self, id: ReviewId) -> DomainResult<UserId> {
        let user_id = self.require_login()?;
        let review = self.review(id).await?;
        if !review.is_owned_by(user_id) {
            return Err(DomainError::Forbidden("review"));
        }
        Ok(user_id)
    }

    async fn require_comment_owner(
        &self,
        review_id: ReviewId,
        id: CommentId,
    ) -> DomainResult<UserId> {
        let user_id = self.require_login()?;
        let comment = self
            .comments(review_id)
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::comment_not_found(id.get()))?;
        if !comment.is_owned_by(user_id) {
            return Err(DomainError::Forbidden("comment"));
        }
        Ok(user_id)
    }
}
