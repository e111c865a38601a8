use reviewhub_core::domain::{NewReview, ReviewPatch, UserId};
use reviewhub_core::query::ReviewQuery;

use super::Output;
use crate::cli::ReviewCommand;
use crate::error::AppResult;
use crate::render;
use crate::state::AppState;

pub async fn run(command: ReviewCommand, state: &AppState, output: Output) -> AppResult<()> {
    let client = &state.client;
    match command {
        ReviewCommand::List {
            category,
            search,
            sort,
        } => {
            let query = ReviewQuery {
                category,
                search,
                sort,
            };
            let reviews = client.reviews(&query).await?;
            output.emit(&reviews, || render::review_list(&reviews))
        }
        ReviewCommand::Show { id } => {
            let review = client.review_by_param(&id).await?;
            let (comments, authors) =
                tokio::try_join!(client.comments(review.id), client.authors())?;
            output.emit(&review, || render::review_detail(&review, &comments, &authors))
        }
        ReviewCommand::Create {
            title,
            content,
            category,
            rating,
            images,
            tags,
        } => {
            let outcome = client
                .create_review(NewReview {
                    // replaced with the session user
                    user_id: UserId(0),
                    title,
                    content,
                    category,
                    rating,
                    images,
                    tags,
                })
                .await?;
            output.emit(&outcome.value, || {
                format!(
                    "Created review #{}. Next: {}",
                    outcome.value.id,
                    render::route(outcome.navigate_to)
                )
            })
        }
        ReviewCommand::Edit {
            id,
            title,
            content,
            category,
            rating,
            images,
            tags,
        } => {
            let patch = ReviewPatch {
                title,
                content,
                category,
                rating,
                images,
                tags,
            };
            let outcome = client.update_review(id, patch).await?;
            output.emit(&outcome.value, || {
                format!(
                    "Updated review #{id}. Next: {}",
                    render::route(outcome.navigate_to)
                )
            })
        }
        ReviewCommand::Delete { id } => {
            let outcome = client.delete_review(id).await?;
            output.emit(&serde_json::json!({ "deleted": id }), || {
                format!(
                    "Deleted review #{id}. Next: {}",
                    render::route(outcome.navigate_to)
                )
            })
        }
    }
}
