use clap::Subcommand;

use super::Output;
use crate::db::moods;
use crate::error::AppResult;
use crate::models::{MoodValue, NewMoodEntry};
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum MoodCommand {
    /// Record a mood: a 1-10 score or a mood word
    Log {
        #[arg(long)]
        user: String,
        mood: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        assessment: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long = "activity")]
        activities: Vec<String>,
    },

    /// List a user's moods, newest first
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Count, average score and latest entry
    Summary {
        #[arg(long)]
        user: String,
    },

    /// Delete an entry
    Delete { id: String },
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

pub fn run(command: MoodCommand, state: &AppState) -> AppResult<Output> {
    match command {
        MoodCommand::Log {
            user,
            mood,
            notes,
            assessment,
            tags,
            activities,
        } => {
            let entry = moods::create_entry(
                &state.db,
                NewMoodEntry {
                    user_id: user,
                    mood: MoodValue::parse(&mood),
                    assessment_result: assessment,
                    notes,
                    tags: non_empty(tags),
                    activities: non_empty(activities),
                },
            )?;
            Output::record(&entry)
        }
        MoodCommand::List { user, limit } => {
            let limit = limit.unwrap_or(state.config.limits.list_limit);
            Output::fetched(moods::list_entries(&state.db, &user, limit))
        }
        MoodCommand::Summary { user } => Output::fetched(moods::summarize(&state.db, &user)),
        MoodCommand::Delete { id } => {
            moods::delete_entry(&state.db, &id)?;
            Ok(Output::text(format!("deleted {}", id)))
        }
    }
}
