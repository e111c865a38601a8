//! Review query pipeline: category filter, then free-text search, then sort.
//!
//! Everything in here is a pure function over an in-memory list. The two
//! filters commute, so the fixed order only matters for deciding which part
//! can be pushed down to a remote endpoint (the category can, search cannot).

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Comment, Review};
use crate::error::DomainError;

/// The four supported orderings. Sorting is stable; ties keep source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Newest `created_at` first.
    Latest,
    /// Oldest `created_at` first.
    Oldest,
    /// Highest rating first.
    RatingHigh,
    /// Lowest rating first.
    RatingLow,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Latest,
        SortOrder::Oldest,
        SortOrder::RatingHigh,
        SortOrder::RatingLow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Oldest => "oldest",
            SortOrder::RatingHigh => "ratingHigh",
            SortOrder::RatingLow => "ratingLow",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    /// Accepts the wire names (`ratingHigh`) and their kebab-case spelling
    /// (`rating-high`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "").to_ascii_lowercase();
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "unknown sort order '{s}' (expected latest, oldest, ratingHigh or ratingLow)"
                ))
            })
    }
}

/// Parameters of one review list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReviewQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
}

impl ReviewQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matching(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Trim parameters and drop blank ones, so equivalent queries compare equal.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }
        Self {
            category: clean(&self.category),
            search: clean(&self.search),
            sort: self.sort,
        }
    }

    /// Run the whole pipeline over `reviews`.
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        let query = self.normalized();
        let mut reviews = match &query.category {
            Some(category) => filter_by_category(reviews, category),
            None => reviews,
        };
        if let Some(term) = &query.search {
            reviews = search(reviews, term);
        }
        if let Some(order) = query.sort {
            sort_reviews(&mut reviews, order);
        }
        reviews
    }
}

/// Keep reviews whose category wire name equals `category` exactly.
pub fn filter_by_category(reviews: Vec<Review>, category: &str) -> Vec<Review> {
    reviews
        .into_iter()
        .filter(|r| r.category.as_str() == category)
        .collect()
}

/// Case-insensitive substring match on title, content or any tag.
pub fn matches_search(review: &Review, term: &str) -> bool {
    let needle = term.to_lowercase();
    review.title.to_lowercase().contains(&needle)
        || review.content.to_lowercase().contains(&needle)
        || review
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Keep reviews matching `term`. A blank term keeps everything.
pub fn search(reviews: Vec<Review>, term: &str) -> Vec<Review> {
    let term = term.trim();
    if term.is_empty() {
        return reviews;
    }
    reviews
        .into_iter()
        .filter(|r| matches_search(r, term))
        .collect()
}

pub fn sort_reviews(reviews: &mut [Review], order: SortOrder) {
    match order {
        SortOrder::Latest => reviews.sort_by_key(|r| Reverse(r.created_at)),
        SortOrder::Oldest => reviews.sort_by_key(|r| r.created_at),
        SortOrder::RatingHigh => reviews.sort_by_key(|r| Reverse(r.rating)),
        SortOrder::RatingLow => reviews.sort_by_key(|r| r.rating),
    }
}

/// Comments are always shown newest first.
pub fn sort_comments_by_recency(comments: &mut [Comment]) {
    comments.sort_by_key(|c| Reverse(c.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Rating, ReviewId, UserId, wire::parse_timestamp};

    fn review(id: u64, rating: u8, created_at: &str) -> Review {
        let ts = parse_timestamp(created_at).unwrap();
        Review {
            id: ReviewId(id),
            user_id: UserId(1),
            title: format!("Review {id}"),
            content: String::new(),
            category: Category::Food,
            rating: Rating::new(rating).unwrap(),
            images: vec![],
            tags: vec![],
            created_at: ts,
            updated_at: ts,
        }
    }

    fn ids(reviews: &[Review]) -> Vec<u64> {
        reviews.iter().map(|r| r.id.get()).collect()
    }

    fn sample() -> Vec<Review> {
        let mut ramen = review(1, 4, "2024-03-01");
        ramen.title = "Great ramen".to_string();
        ramen.content = "so good".to_string();
        ramen.tags = vec!["noodle".to_string()];

        let mut jacket = review(2, 2, "2024-01-15");
        jacket.category = Category::Clothing;
        jacket.title = "Rain jacket".to_string();
        jacket.content = "kept me dry, unlike the ramen stall roof".to_string();

        let mut park = review(3, 5, "2024-02-10");
        park.category = Category::Place;
        park.title = "City park".to_string();
        park.tags = vec!["Picnic".to_string(), "walk".to_string()];

        let cafe = review(4, 3, "2023-12-24");
        vec![ramen, jacket, park, cafe]
    }

    #[test]
    fn test_sort_example() {
        let input = vec![review(1, 3, "2024-01-01"), review(2, 5, "2024-02-01")];

        let mut by_rating = input.clone();
        sort_reviews(&mut by_rating, SortOrder::RatingHigh);
        assert_eq!(ids(&by_rating), vec![2, 1]);

        let mut by_age = input;
        sort_reviews(&mut by_age, SortOrder::Oldest);
        assert_eq!(ids(&by_age), vec![1, 2]);
    }

    #[test]
    fn test_every_sort_is_a_permutation() {
        let mut expected = ids(&sample());
        expected.sort();
        for order in SortOrder::ALL {
            let mut sorted = sample();
            sort_reviews(&mut sorted, order);
            let mut got = ids(&sorted);
            got.sort();
            assert_eq!(got, expected, "{order} lost or duplicated reviews");
        }
    }

    #[test]
    fn test_sorts_follow_their_keys() {
        let mut latest = sample();
        sort_reviews(&mut latest, SortOrder::Latest);
        assert!(latest.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let mut low = sample();
        sort_reviews(&mut low, SortOrder::RatingLow);
        assert!(low.windows(2).all(|w| w[0].rating <= w[1].rating));
    }

    #[test]
    fn test_latest_is_reverse_of_oldest() {
        let mut latest = sample();
        sort_reviews(&mut latest, SortOrder::Latest);
        let mut oldest = sample();
        sort_reviews(&mut oldest, SortOrder::Oldest);
        oldest.reverse();
        assert_eq!(ids(&latest), ids(&oldest));
    }

    #[test]
    fn test_category_filter() {
        let food = filter_by_category(sample(), "food");
        assert_eq!(ids(&food), vec![1, 4]);
        assert!(food.iter().all(|r| r.category == Category::Food));
        assert!(filter_by_category(sample(), "vehicles").is_empty());
        assert!(filter_by_category(sample(), "Food").is_empty());
    }

    #[test]
    fn test_search_example() {
        let reviews = sample();
        let ramen = &reviews[0];
        assert!(matches_search(ramen, "ramen"));
        assert!(matches_search(ramen, "NOODLE"));
        assert!(!matches_search(ramen, "pizza"));
    }

    #[test]
    fn test_search_uses_or_semantics_across_fields() {
        // title on #1, content on #2
        assert_eq!(ids(&search(sample(), "Ramen")), vec![1, 2]);
        // only a tag on #3
        assert_eq!(ids(&search(sample(), "picnic")), vec![3]);
        assert!(search(sample(), "pizza").is_empty());
    }

    #[test]
    fn test_blank_search_equals_no_search() {
        let with_blank = ReviewQuery::all()
            .in_category("food")
            .matching("   ")
            .sorted(SortOrder::Latest);
        let without = ReviewQuery::all()
            .in_category("food")
            .sorted(SortOrder::Latest);
        assert_eq!(with_blank.normalized(), without.normalized());
        assert_eq!(ids(&with_blank.apply(sample())), ids(&without.apply(sample())));
    }

    #[test]
    fn test_pipeline_composes_filter_search_sort() {
        let query = ReviewQuery::all()
            .matching("ramen")
            .sorted(SortOrder::RatingLow);
        assert_eq!(ids(&query.apply(sample())), vec![2, 1]);

        let food_only = query.in_category("food");
        assert_eq!(ids(&food_only.apply(sample())), vec![1]);
    }

    #[test]
    fn test_no_sort_keeps_source_order() {
        assert_eq!(ids(&ReviewQuery::all().apply(sample())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("ratingHigh".parse::<SortOrder>().unwrap(), SortOrder::RatingHigh);
        assert_eq!("rating-low".parse::<SortOrder>().unwrap(), SortOrder::RatingLow);
        assert_eq!("LATEST".parse::<SortOrder>().unwrap(), SortOrder::Latest);
        assert!("newest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_comments_newest_first() {
        let mk = |id: u64, at: &str| {
            let ts = parse_timestamp(at).unwrap();
            Comment {
                id: crate::domain::CommentId(id),
                review_id: ReviewId(1),
                user_id: UserId(1),
                content: "c".to_string(),
                created_at: ts,
                updated_at: ts,
            }
        };
        let mut comments = vec![mk(1, "2024-01-01"), mk(2, "2024-03-01"), mk(3, "2024-02-01")];
        sort_comments_by_recency(&mut comments);
        let order: Vec<u64> = comments.iter().map(|c| c.id.get()).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
