use clap::Subcommand;

use super::Output;
use crate::db::chat;
use crate::error::AppResult;
use crate::models::{MessageStatus, NewChatMessage};
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// Open a conversation between two or more profiles
    Open {
        #[arg(required = true, num_args = 2..)]
        participants: Vec<String>,
    },

    /// Send a message
    Send {
        #[arg(long)]
        conversation: String,
        #[arg(long)]
        sender: String,
        #[arg(long)]
        content: String,
    },

    /// Move a message to delivered or read
    Status { id: String, status: MessageStatus },

    /// Mark everything a reader received in a conversation as read
    Read {
        #[arg(long)]
        conversation: String,
        #[arg(long)]
        reader: String,
    },

    /// Message history, oldest first
    Messages {
        conversation: String,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Conversations of a user with unread counts
    Inbox {
        #[arg(long)]
        user: String,
    },
}

pub fn run(command: ChatCommand, state: &AppState) -> AppResult<Output> {
    let db = &state.db;
    match command {
        ChatCommand::Open { participants } => {
            Output::record(&chat::create_conversation(db, &participants)?)
        }
        ChatCommand::Send {
            conversation,
            sender,
            content,
        } => {
            let message = chat::send_message(
                db,
                NewChatMessage {
                    conversation_id: conversation,
                    sender_id: sender,
                    content,
                },
            )?;
            Output::record(&message)
        }
        ChatCommand::Status { id, status } => {
            Output::record(&chat::update_message_status(db, &id, status)?)
        }
        ChatCommand::Read {
            conversation,
            reader,
        } => {
            let changed = chat::mark_conversation_read(db, &conversation, &reader)?;
            Ok(Output::text(format!("marked {} read", changed)))
        }
        ChatCommand::Messages {
            conversation,
            limit,
        } => {
            let limit = limit.unwrap_or(state.config.limits.list_limit);
            Output::fetched(chat::list_messages(db, &conversation, limit))
        }
        ChatCommand::Inbox { user } => Output::fetched(chat::list_conversations(db, &user)),
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::*;

    #[test]
    fn status_cannot_regress_from_the_command_line() {
        let state = state();
        let a = id_of(&exec(&state, &["profile", "add", "--role", "patient"]));
        let b = id_of(&exec(&state, &["profile", "add", "--role", "mood_mentor"]));
        let conversation = id_of(&exec(&state, &["chat", "open", &a, &b]));
        let sent = exec(
            &state,
            &["chat", "send", "--conversation", &conversation, "--sender", &a, "--content", "hi"],
        );

        let read = exec(&state, &["chat", "status", &id_of(&sent), "read"]);
        assert_eq!(read.body["status"], "read");

        let cli = <crate::config::Cli as clap::Parser>::try_parse_from([
            "moodmentor",
            "chat",
            "status",
            id_of(&sent).as_str(),
            "delivered",
        ])
        .unwrap();
        assert!(crate::commands::run(cli.command, &state).is_err());

        let history = exec(&state, &["chat", "messages", &conversation]);
        assert_eq!(history.body["data"][0]["status"], "read");
    }

    #[test]
    fn open_needs_two_participants() {
        let result = <crate::config::Cli as clap::Parser>::try_parse_from([
            "moodmentor", "chat", "open", "only-one",
        ]);
        assert!(result.is_err());
    }
}
