use clap::Subcommand;

use super::Output;
use crate::db::stress;
use crate::error::AppResult;
use crate::models::NewStressAssessment;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum StressCommand {
    /// Record an assessment
    Log {
        #[arg(long)]
        user: String,
        #[arg(long)]
        level: f64,
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
        #[arg(long = "trigger")]
        triggers: Vec<String>,
        #[arg(long = "coping")]
        coping_strategies: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List a user's assessments, newest first
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Most recent assessment
    Latest {
        #[arg(long)]
        user: String,
    },
}

pub fn run(command: StressCommand, state: &AppState) -> AppResult<Output> {
    match command {
        StressCommand::Log {
            user,
            level,
            symptoms,
            triggers,
            coping_strategies,
            notes,
        } => {
            let assessment = stress::create_assessment(
                &state.db,
                &state.config.stress_scale(),
                NewStressAssessment {
                    user_id: user,
                    stress_level: level,
                    symptoms,
                    triggers,
                    coping_strategies: if coping_strategies.is_empty() {
                        None
                    } else {
                        Some(coping_strategies)
                    },
                    notes,
                },
            )?;
            Output::record(&assessment)
        }
        StressCommand::List { user, limit } => {
            let limit = limit.unwrap_or(state.config.limits.list_limit);
            Output::fetched(stress::list_assessments(&state.db, &user, limit))
        }
        StressCommand::Latest { user } => {
            Output::fetched(stress::latest_assessment(&state.db, &user))
        }
    }
}
