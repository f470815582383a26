use clap::Subcommand;

use super::{edit_field, Output};
use crate::db::notifications;
use crate::error::AppResult;
use crate::models::{
    CreateNotificationParams, Metadata, NotificationType, UpdateNotificationParams,
};
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum NotifyCommand {
    /// Create a notification
    Send {
        #[arg(long)]
        user: String,
        /// appointment, message, review, system or reminder
        #[arg(long = "type")]
        kind: NotificationType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        link: Option<String>,
        /// key=value, repeatable
        #[arg(long = "meta")]
        meta: Vec<String>,
    },

    /// List a user's notifications, newest first
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Number of unread notifications
    Count {
        #[arg(long)]
        user: String,
    },

    /// Mark one notification read
    Read { id: String },

    /// Mark every notification of a user read
    ReadAll {
        #[arg(long)]
        user: String,
    },

    /// Change fields of a notification
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long = "type")]
        kind: Option<NotificationType>,
        #[arg(long, conflicts_with = "clear_link")]
        link: Option<String>,
        /// Remove the link
        #[arg(long)]
        clear_link: bool,
    },

    /// Delete a notification
    Delete { id: String },
}

pub fn run(command: NotifyCommand, state: &AppState) -> AppResult<Output> {
    let db = &state.db;
    let max_meta = state.config.limits.metadata_entries;
    match command {
        NotifyCommand::Send {
            user,
            kind,
            title,
            message,
            link,
            meta,
        } => {
            let metadata = Metadata::from_pairs(meta.iter().map(String::as_str))?;
            let notification = notifications::create_notification(
                db,
                max_meta,
                CreateNotificationParams {
                    user_id: user,
                    title,
                    message,
                    kind,
                    link,
                    metadata: Some(metadata),
                },
            )?;
            Output::record(&notification)
        }
        NotifyCommand::List {
            user,
            unread,
            limit,
        } => {
            let limit = limit.unwrap_or(state.config.limits.list_limit);
            Output::fetched(notifications::list_notifications(db, &user, unread, limit))
        }
        NotifyCommand::Count { user } => {
            Output::fetched(notifications::unread_count(db, &user))
        }
        NotifyCommand::Read { id } => Output::record(&notifications::mark_as_read(db, &id)?),
        NotifyCommand::ReadAll { user } => {
            let changed = notifications::mark_all_as_read(db, &user)?;
            Ok(Output::text(format!("marked {} read", changed)))
        }
        NotifyCommand::Edit {
            id,
            title,
            message,
            kind,
            link,
            clear_link,
        } => {
            let update = UpdateNotificationParams {
                title,
                message,
                kind,
                link: edit_field(link, clear_link),
                ..Default::default()
            };
            Output::record(&notifications::update_notification(db, max_meta, &id, update)?)
        }
        NotifyCommand::Delete { id } => {
            notifications::delete_notification(db, &id)?;
            Ok(Output::text(format!("deleted {}", id)))
        }
    }
}
