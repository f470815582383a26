use clap::Subcommand;

use super::{edit_field, Output};
use crate::db::journals;
use crate::error::AppResult;
use crate::models::{MoodValue, NewJournalEntry, UpdateJournalEntry};
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// Write a new entry
    Add {
        #[arg(long)]
        user: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        title: Option<String>,
        /// 1-10 score or a mood word
        #[arg(long)]
        mood: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List a user's entries, newest first
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one entry
    Show { id: String },

    /// Change fields of an entry
    Edit {
        id: String,
        #[arg(long, conflicts_with = "clear_title")]
        title: Option<String>,
        /// Remove the title
        #[arg(long)]
        clear_title: bool,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "clear_mood")]
        mood: Option<String>,
        /// Remove the mood
        #[arg(long)]
        clear_mood: bool,
        /// Replaces all tags when given
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete an entry
    Delete { id: String },

    /// Share an entry and print its share code
    Share { id: String },

    /// Make a shared entry private again
    Unshare { id: String },

    /// Look up a shared entry by its code
    Shared { code: String },
}

pub fn run(command: JournalCommand, state: &AppState) -> AppResult<Output> {
    let db = &state.db;
    match command {
        JournalCommand::Add {
            user,
            content,
            title,
            mood,
            tags,
        } => {
            let entry = journals::create_entry(
                db,
                NewJournalEntry {
                    user_id: user,
                    title,
                    content,
                    mood: mood.as_deref().map(MoodValue::parse),
                    tags,
                },
            )?;
            Output::record(&entry)
        }
        JournalCommand::List { user, limit } => {
            let limit = limit.unwrap_or(state.config.limits.list_limit);
            Output::fetched(journals::list_entries(db, &user, limit))
        }
        JournalCommand::Show { id } => Output::fetched(journals::get_entry(db, &id)),
        JournalCommand::Edit {
            id,
            title,
            clear_title,
            content,
            mood,
            clear_mood,
            tags,
        } => {
            let update = UpdateJournalEntry {
                title: edit_field(title, clear_title),
                content,
                mood: edit_field(mood.as_deref().map(MoodValue::parse), clear_mood),
                tags: if tags.is_empty() { None } else { Some(tags) },
            };
            Output::record(&journals::update_entry(db, &id, update)?)
        }
        JournalCommand::Delete { id } => {
            journals::delete_entry(db, &id)?;
            Ok(Output::text(format!("deleted {}", id)))
        }
        JournalCommand::Share { id } => Output::record(&journals::share_entry(db, &id)?),
        JournalCommand::Unshare { id } => Output::record(&journals::unshare_entry(db, &id)?),
        JournalCommand::Shared { code } => Output::fetched(journals::find_by_share_code(db, &code)),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::commands::test_support::*;

    fn patient(state: &crate::state::AppState) -> String {
        id_of(&exec(state, &["profile", "add", "--role", "patient"]))
    }

    #[test]
    fn add_list_and_edit() {
        let state = state();
        let user = patient(&state);
        let added = exec(
            &state,
            &["journal", "add", "--user", &user, "--content", "Calm morning", "--mood", "8", "--tag", "Mornings"],
        );
        assert_eq!(added.body["mood"], 8);
        assert!(added.body["title"].is_null());

        let listed = exec(&state, &["journal", "list", "--user", &user]);
        assert_eq!(listed.exit_code, 0);
        assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);
        assert!(listed.body["error"].is_null());

        let edited = exec(&state, &["journal", "edit", &id_of(&added), "--mood", "grateful"]);
        assert_eq!(edited.body["mood"], "grateful");
        assert_eq!(edited.body["tags"][0], "mornings");

        let cleared = exec(&state, &["journal", "edit", &id_of(&added), "--clear-mood"]);
        assert!(cleared.body["mood"].is_null());
        assert_eq!(cleared.body["content"], "Calm morning");
    }

    #[test]
    fn invalid_mood_is_rejected() {
        let state = state();
        let user = patient(&state);
        let cli = crate::config::Cli::try_parse_from([
            "moodmentor", "journal", "add", "--user", user.as_str(), "--content", "x", "--mood", "0",
        ])
        .unwrap();
        assert!(crate::commands::run(cli.command, &state).is_err());
    }

    #[test]
    fn unshare_hides_entry_from_code_lookup() {
        let state = state();
        let user = patient(&state);
        let added = exec(&state, &["journal", "add", "--user", &user, "--content", "for Sam"]);
        let shared = exec(&state, &["journal", "share", &id_of(&added)]);
        let code = shared.body["share_code"].as_str().unwrap().to_string();

        exec(&state, &["journal", "unshare", &id_of(&added)]);
        let lookup = exec(&state, &["journal", "shared", &code]);
        assert_eq!(lookup.exit_code, 3);
        assert!(lookup.body["error"].is_string());
    }
}
