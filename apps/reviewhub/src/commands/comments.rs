use super::Output;
use crate::cli::CommentCommand;
use crate::error::AppResult;
use crate::render;
use crate::state::AppState;

pub async fn run(command: CommentCommand, state: &AppState, output: Output) -> AppResult<()> {
    let client = &state.client;
    match command {
        CommentCommand::List { review_id } => {
            let (comments, authors) =
                tokio::try_join!(client.comments(review_id), client.authors())?;
            output.emit(&comments, || render::comment_list(&comments, &authors))
        }
        CommentCommand::Add { review_id, content } => {
            let outcome = client.create_comment(review_id, &content).await?;
            output.emit(&outcome.value, || {
                format!(
                    "Added comment #{}. Next: {}",
                    outcome.value.id,
                    render::route(outcome.navigate_to)
                )
            })
        }
        CommentCommand::Edit {
            review_id,
            comment_id,
            content,
        } => {
            let outcome = client
                .update_comment(review_id, comment_id, &content)
                .await?;
            output.emit(&outcome.value, || {
                format!(
                    "Updated comment #{comment_id}. Next: {}",
                    render::route(outcome.navigate_to)
                )
            })
        }
        CommentCommand::Delete {
            review_id,
            comment_id,
        } => {
            let outcome = client.delete_comment(review_id, comment_id).await?;
            output.emit(&serde_json::json!({ "deleted": comment_id }), || {
                format!(
                    "Deleted comment #{comment_id}. Next: {}",
                    render::route(outcome.navigate_to)
                )
            })
        }
    }
}
