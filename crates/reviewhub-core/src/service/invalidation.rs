//! Typed cache keys and the mutation -> stale query dependency table.

use crate::domain::ReviewId;
use crate::error::WriteAction;
use crate::query::ReviewQuery;

/// Identifies one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// A review list. Always holds a normalized query.
    Reviews(ReviewQuery),
    Review(ReviewId),
    Comments(ReviewId),
    Users,
}

/// Groups of keys that are invalidated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    Reviews,
    Review,
    Comments,
    Users,
}

impl KeyFamily {
    /// Every cache key of the family starts with this prefix, and no key of
    /// another family does.
    pub fn prefix(self) -> &'static str {
        match self {
            KeyFamily::Reviews => "reviews:",
            KeyFamily::Review => "review:",
            KeyFamily::Comments => "comments:",
            KeyFamily::Users => "users:",
        }
    }
}

impl QueryKey {
    pub fn reviews(query: &ReviewQuery) -> Self {
        Self::Reviews(query.normalized())
    }

    pub fn family(&self) -> KeyFamily {
        match self {
            QueryKey::Reviews(_) => KeyFamily::Reviews,
            QueryKey::Review(_) => KeyFamily::Review,
            QueryKey::Comments(_) => KeyFamily::Comments,
            QueryKey::Users => KeyFamily::Users,
        }
    }

    /// String form used with the [`Cache`](crate::ports::Cache) port.
    pub fn cache_key(&self) -> String {
        let prefix = self.family().prefix();
        match self {
            QueryKey::Reviews(query) => {
                let query = query.normalized();
                let params = serde_json::json!([
                    query.category,
                    query.search,
                    query.sort.map(|s| s.as_str()),
                ]);
                format!("{prefix}{params}")
            }
            QueryKey::Review(id) | QueryKey::Comments(id) => format!("{prefix}{id}"),
            QueryKey::Users => format!("{prefix}all"),
        }
    }
}

/// Which cached queries a successful mutation makes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependent {
    /// Every key of a family, whatever its parameters.
    Family(KeyFamily),
    /// The detail entry of the mutated review.
    ReviewDetail,
    /// The comment list of the review the mutated comment belongs to.
    CommentsOfReview,
}

/// The invalidation policy, one row per write.
pub const INVALIDATION_TABLE: &[(WriteAction, &[Dependent])] = &[
    (
        WriteAction::CreateReview,
        &[Dependent::Family(KeyFamily::Reviews)],
    ),
    (
        WriteAction::UpdateReview,
        &[Dependent::Family(KeyFamily::Reviews), Dependent::ReviewDetail],
    ),
    (
        WriteAction::DeleteReview,
        &[Dependent::Family(KeyFamily::Reviews), Dependent::ReviewDetail],
    ),
    (WriteAction::CreateComment, &[Dependent::CommentsOfReview]),
    (WriteAction::UpdateComment, &[Dependent::CommentsOfReview]),
    (WriteAction::DeleteComment, &[Dependent::CommentsOfReview]),
];

/// A concrete cache operation derived from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    Family(KeyFamily),
    Key(QueryKey),
}

impl Invalidation {
    /// Resolve the table row of `action` for the review it touched.
    pub fn for_write(action: WriteAction, review_id: ReviewId) -> Vec<Invalidation> {
        INVALIDATION_TABLE
            .iter()
            .filter(|(row, _)| *row == action)
            .flat_map(|(_, dependents)| dependents.iter())
            .map(|dependent| match dependent {
                Dependent::Family(family) => Invalidation::Family(*family),
                Dependent::ReviewDetail => Invalidation::Key(QueryKey::Review(review_id)),
                Dependent::CommentsOfReview => Invalidation::Key(QueryKey::Comments(review_id)),
            })
            .collect()
    }
}
