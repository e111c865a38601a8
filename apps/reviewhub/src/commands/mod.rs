//! Command handlers. Each prints its result to stdout.

mod comments;
mod reviews;
mod session;

use serde::Serialize;

use crate::cli::Command;
use crate::error::AppResult;
use crate::state::AppState;

/// Output format selected with `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    /// Print `value` as JSON, or the text produced by `text`.
    pub(crate) fn emit<T: Serialize>(self, value: &T, text: impl FnOnce() -> String) -> AppResult<()> {
        match self {
            Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
            Output::Text => println!("{}", text()),
        }
        Ok(())
    }
}

pub async fn run(command: Command, state: &AppState, output: Output) -> AppResult<()> {
    match command {
        Command::Reviews(cmd) => reviews::run(cmd, state, output).await,
        Command::Comments(cmd) => comments::run(cmd, state, output).await,
        Command::Login { email, password } => session::login(state, &email, &password, output).await,
        Command::Logout => session::logout(state).await,
        Command::Whoami => session::whoami(state, output),
    }
}
