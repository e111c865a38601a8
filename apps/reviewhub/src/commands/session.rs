use reviewhub_core::domain::mask_email;

use super::Output;
use crate::error::AppResult;
use crate::render;
use crate::state::AppState;

pub async fn login(state: &AppState, email: &str, password: &str, output: Output) -> AppResult<()> {
    let outcome = state.client.login(email, password).await?;
    output.emit(&outcome.user, || {
        format!("Welcome, {}!", outcome.user.nickname)
    })
}

pub async fn logout(state: &AppState) -> AppResult<()> {
    state.client.logout().await?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(state: &AppState, output: Output) -> AppResult<()> {
    let session = state.client.session().current();
    match &session.user {
        Some(user) if session.is_logged_in => {
            tracing::debug!(user_email = %mask_email(&user.email), "Session active");
            output.emit(user, || render::user(user))
        }
        _ => output.emit(&session, || "Not logged in.".to_string()),
    }
}
