// Command-line front end: one module per record kind, each turning parsed
// arguments into store calls and a printable result.

pub mod chat;
pub mod fmt;
pub mod journal;
pub mod mood;
pub mod notify;
pub mod profile;
pub mod stress;

use clap::Subcommand;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::ServiceResponse;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Patient and mood mentor profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommand),

    /// Journal entries and sharing
    #[command(subcommand)]
    Journal(journal::JournalCommand),

    /// Mood log
    #[command(subcommand)]
    Mood(mood::MoodCommand),

    /// Stress assessments
    #[command(subcommand)]
    Stress(stress::StressCommand),

    /// Notifications
    #[command(subcommand)]
    Notify(notify::NotifyCommand),

    /// Conversations and messages
    #[command(subcommand)]
    Chat(chat::ChatCommand),

    /// Formatting helpers
    #[command(subcommand)]
    Fmt(fmt::FmtCommand),
}

/// What a command prints and how the process should exit.
#[derive(Debug)]
pub struct Output {
    pub body: serde_json::Value,
    pub exit_code: i32,
}

impl Output {
    pub fn record<T: Serialize>(value: &T) -> AppResult<Self> {
        Ok(Self {
            body: serde_json::to_value(value)?,
            exit_code: 0,
        })
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            body: serde_json::Value::String(value.into()),
            exit_code: 0,
        }
    }

    /// Wrap a fetch result in the `{ data, error }` envelope. A failed fetch
    /// still prints, but exits non-zero.
    pub fn fetched<T: Serialize>(result: AppResult<T>) -> AppResult<Self> {
        let exit_code = result.as_ref().err().map(AppError::exit_code).unwrap_or(0);
        let response = ServiceResponse::from(result);
        Ok(Self {
            body: serde_json::to_value(&response)?,
            exit_code,
        })
    }

    /// Rendered form for stdout: strings raw, everything else pretty JSON.
    pub fn render(&self) -> AppResult<String> {
        match &self.body {
            serde_json::Value::String(s) => Ok(s.clone()),
            other => Ok(serde_json::to_string_pretty(other)?),
        }
    }
}

/// Map an optional flag value plus a `--clear-*` switch onto an update field.
pub(crate) fn edit_field<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

pub fn run(command: Command, state: &AppState) -> AppResult<Output> {
    match command {
        Command::Profile(cmd) => profile::run(cmd, state),
        Command::Journal(cmd) => journal::run(cmd, state),
        Command::Mood(cmd) => mood::run(cmd, state),
        Command::Stress(cmd) => stress::run(cmd, state),
        Command::Notify(cmd) => notify::run(cmd, state),
        Command::Chat(cmd) => chat::run(cmd, state),
        Command::Fmt(cmd) => fmt::run(cmd, &state.config),
    }
}
