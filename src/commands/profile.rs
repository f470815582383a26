use clap::Subcommand;

use super::Output;
use crate::db::profiles;
use crate::error::AppResult;
use crate::models::{NewProfile, Role};
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Create a profile
    Add {
        /// patient or mood_mentor
        #[arg(long)]
        role: Role,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },

    /// Show one profile
    Show { id: String },

    /// List profiles, optionally by role
    List {
        #[arg(long)]
        role: Option<Role>,
    },
}

pub fn run(command: ProfileCommand, state: &AppState) -> AppResult<Output> {
    match command {
        ProfileCommand::Add {
            role,
            email,
            name,
            avatar_url,
        } => {
            let profile = profiles::create_profile(
                &state.db,
                NewProfile {
                    email,
                    full_name: name,
                    role,
                    avatar_url,
                },
            )?;
            Output::record(&profile)
        }
        ProfileCommand::Show { id } => Output::fetched(profiles::get_profile(&state.db, &id)),
        ProfileCommand::List { role } => Output::fetched(profiles::list_profiles(&state.db, role)),
    }
}
