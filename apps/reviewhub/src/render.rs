//! Plain-text rendering of query results.

use chrono::{DateTime, Utc};

use reviewhub_core::domain::{AuthorDirectory, Comment, Review, User};
use reviewhub_core::service::Route;

fn date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

pub fn route(route: Route) -> String {
    match route {
        Route::ReviewList => "/reviews".to_string(),
        Route::ReviewDetail(id) => format!("/reviews/{id}"),
    }
}

pub fn review_line(review: &Review) -> String {
    format!(
        "#{:<4} {} {:<9} {}  ({})",
        review.id.get(),
        review.rating.stars(),
        review.category.label(),
        review.title,
        date(&review.created_at),
    )
}

pub fn review_list(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "No reviews found.".to_string();
    }
    reviews
        .iter()
        .map(review_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn comment_line(comment: &Comment, authors: &AuthorDirectory) -> String {
    format!(
        "[{}] {} ({}): {}",
        comment.id,
        authors.nickname(comment.user_id),
        date(&comment.created_at),
        comment.content,
    )
}

pub fn comment_list(comments: &[Comment], authors: &AuthorDirectory) -> String {
    if comments.is_empty() {
        return "No comments yet.".to_string();
    }
    comments
        .iter()
        .map(|c| comment_line(c, authors))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn review_detail(review: &Review, comments: &[Comment], authors: &AuthorDirectory) -> String {
    let mut out = vec![
        format!("{} {}", review.title, review.rating.stars()),
        format!(
            "{} by {} on {}",
            review.category.label(),
            authors.nickname(review.user_id),
            date(&review.created_at)
        ),
    ];
    if review.updated_at > review.created_at {
        out.push(format!("(edited {})", date(&review.updated_at)));
    }
    out.push(String::new());
    out.push(review.content.clone());
    if !review.tags.is_empty() {
        out.push(format!(
            "\nTags: {}",
            review
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    for image in &review.images {
        out.push(format!("Image: {image}"));
    }
    out.push(format!("\nComments ({})", comments.len()));
    out.push(comment_list(comments, authors));
    out.join("\n")
}

pub fn user(user: &User) -> String {
    format!("{} <{}> (@{}, id {})", user.nickname, user.email, user.username, user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewhub_core::domain::{Category, CommentId, Rating, ReviewId, UserId, wire::parse_timestamp};

    fn review() -> Review {
        let ts = parse_timestamp("2024-03-01").unwrap();
        Review {
            id: ReviewId(1),
            user_id: UserId(1),
            title: "Great ramen".to_string(),
            content: "so good".to_string(),
            category: Category::Food,
            rating: Rating::new(4).unwrap(),
            images: vec![],
            tags: vec!["noodle".to_string()],
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_routes() {
        assert_eq!(route(Route::ReviewList), "/reviews");
        assert_eq!(route(Route::ReviewDetail(ReviewId(3))), "/reviews/3");
    }

    #[test]
    fn test_review_line() {
        let line = review_line(&review());
        assert!(line.starts_with("#1"));
        assert!(line.contains("Great ramen"));
        assert!(line.ends_with("(2024-03-01)"));
    }

    #[test]
    fn test_unknown_comment_author() {
        let ts = parse_timestamp("2024-03-02").unwrap();
        let comment = Comment {
            id: CommentId(7),
            review_id: ReviewId(1),
            user_id: UserId(42),
            content: "agreed".to_string(),
            created_at: ts,
            updated_at: ts,
        };
        let line = comment_line(&comment, &AuthorDirectory::default());
        assert_eq!(line, "[7] Unknown (2024-03-02): agreed");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(review_list(&[]), "No reviews found.");
    }
}
