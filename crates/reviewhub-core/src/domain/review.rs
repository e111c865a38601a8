use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{ReviewId, UserId, timestamp};
use crate::error::{DomainError, DomainResult};

/// Maximum number of tags a review can carry.
pub const MAX_TAGS: usize = 4;

/// Review category. Serialized with its lowercase wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Place,
    Items,
    Clothing,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Place,
        Category::Items,
        Category::Clothing,
    ];

    /// Wire name, as used in `?category=` filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Place => "place",
            Category::Items => "items",
            Category::Clothing => "clothing",
        }
    }

    /// Display label for headings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Place => "Places",
            Category::Items => "Items",
            Category::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "unknown category '{s}' (expected food, place, items or clothing)"
                ))
            })
    }
}

/// Star rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> DomainResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::Validation(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Five-character star bar, e.g. `★★★☆☆`.
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| DomainError::Validation(format!("rating {value} is out of range")))
            .and_then(Rating::new)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::Validation(format!("'{s}' is not a rating")))?;
        Rating::try_from(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub rating: Rating,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Merge a patch into the stored record.
    ///
    /// `id`, `user_id` and `created_at` are never touched; `updated_at` is set
    /// to `now`, clamped so it never falls behind `created_at`.
    pub fn apply(&mut self, patch: ReviewPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// A review as submitted by its author, before the endpoint assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub rating: Rating,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewReview {
    /// Trim free-text fields the way the review form does before submitting.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
        self.images = trim_all(self.images);
        self.tags = trim_all(self.tags);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut problems = Vec::new();
        check_required("title", &self.title, &mut problems);
        check_required("content", &self.content, &mut problems);
        check_tags(&self.tags, &mut problems);
        check_images(&self.images, &mut problems);
        into_result(problems)
    }
}

/// Partial update of a review. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self.content = self.content.map(|c| c.trim().to_string());
        self.images = self.images.map(trim_all);
        self.tags = self.tags.map(trim_all);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut problems = Vec::new();
        if let Some(title) = &self.title {
            check_required("title", title, &mut problems);
        }
        if let Some(content) = &self.content {
            check_required("content", content, &mut problems);
        }
        if let Some(tags) = &self.tags {
            check_tags(tags, &mut problems);
        }
        if let Some(images) = &self.images {
            check_images(images, &mut problems);
        }
        into_result(problems)
    }
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}

fn check_required(field: &str, value: &str, problems: &mut Vec<String>) {
    if value.trim().is_empty() {
        problems.push(format!("{field} is required"));
    }
}

fn check_tags(tags: &[String], problems: &mut Vec<String>) {
    if tags.len() > MAX_TAGS {
        problems.push(format!("at most {MAX_TAGS} tags are allowed"));
    }
    if tags.iter().any(|t| t.trim().is_empty()) {
        problems.push("tags cannot be empty".to_string());
    }
    if has_duplicates(tags) {
        problems.push("tags must be unique".to_string());
    }
}

fn check_images(images: &[String], problems: &mut Vec<String>) {
    if images.iter().any(|i| i.trim().is_empty()) {
        problems.push("image URLs cannot be empty".to_string());
    }
    if has_duplicates(images) {
        problems.push("image URLs must be unique".to_string());
    }
}

fn has_duplicates(values: &[String]) -> bool {
    let mut seen = HashSet::new();
    values.iter().any(|v| !seen.insert(v.as_str()))
}

fn into_result(problems: Vec<String>) -> DomainResult<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> NewReview {
        NewReview {
            user_id: UserId(1),
            title: "Great ramen".to_string(),
            content: "so good".to_string(),
            category: Category::Food,
            rating: Rating::new(5).unwrap(),
            images: vec!["https://img.example/ramen.jpg".to_string()],
            tags: vec!["noodle".to_string()],
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(3).unwrap().get(), 3);
        assert!(serde_json::from_str::<Rating>("9").is_err());
        assert_eq!(serde_json::from_str::<Rating>("4").unwrap().get(), 4);
        assert_eq!(Rating::new(3).unwrap().stars(), "★★★☆☆");
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert!("Food".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_string(&Category::Clothing).unwrap(),
            "\"clothing\""
        );
    }

    #[test]
    fn test_review_deserializes_wire_document() {
        let json = r#"{
            "id": "3", "userId": 1, "title": "Cafe", "content": "cozy",
            "category": "place", "rating": 4, "images": [], "tags": ["coffee"],
            "createdAt": "2024-01-01", "updatedAt": "2024-01-02T10:00:00.000Z"
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id, ReviewId(3));
        assert_eq!(review.category, Category::Place);
        assert!(review.updated_at >= review.created_at);
    }

    #[test]
    fn test_validate_accepts_clean_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut bad = draft();
        bad.title = "   ".to_string();
        bad.tags = vec!["a", "b", "c", "d", "a"]
            .into_iter()
            .map(String::from)
            .collect();

        let err = bad.validate().unwrap_err();
        let DomainError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("title is required"));
        assert!(message.contains("at most 4 tags"));
        assert!(message.contains("tags must be unique"));
    }

    #[test]
    fn test_normalized_trims_fields() {
        let mut messy = draft();
        messy.title = "  Great ramen ".to_string();
        messy.tags = vec![" noodle ".to_string()];
        let clean = messy.normalized();
        assert_eq!(clean.title, "Great ramen");
        assert_eq!(clean.tags, vec!["noodle".to_string()]);
    }

    #[test]
    fn test_apply_preserves_identity_and_bumps_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut review = Review {
            id: ReviewId(9),
            user_id: UserId(2),
            title: "Old".to_string(),
            content: "old".to_string(),
            category: Category::Items,
            rating: Rating::new(2).unwrap(),
            images: vec![],
            tags: vec![],
            created_at: created,
            updated_at: created,
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        review.apply(
            ReviewPatch {
                title: Some("New".to_string()),
                rating: Some(Rating::new(5).unwrap()),
                ..Default::default()
            },
            now,
        );

        assert_eq!(review.id, ReviewId(9));
        assert_eq!(review.user_id, UserId(2));
        assert_eq!(review.created_at, created);
        assert_eq!(review.updated_at, now);
        assert_eq!(review.title, "New");
        assert_eq!(review.content, "old");
    }

    #[test]
    fn test_apply_never_moves_updated_at_before_created_at() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut review: Review = serde_json::from_value(serde_json::json!({
            "id": 1, "userId": 1, "title": "t", "content": "c", "category": "food",
            "rating": 3, "createdAt": "2024-05-01", "updatedAt": "2024-05-01"
        }))
        .unwrap();
        let skewed_clock = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        review.apply(ReviewPatch::default(), skewed_clock);
        assert_eq!(review.updated_at, created);
    }
}
