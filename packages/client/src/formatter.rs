//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::ChatMessageDto;
use hiroba_shared::time::to_jst_rfc3339;

const RULE: &str = "------------------------------------------------------------";
const DOUBLE_RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the history received right after joining
    pub fn format_history(history: &[ChatMessageDto], me: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", DOUBLE_RULE));
        output.push_str("History:\n");

        if history.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in history {
                output.push_str(&format!(
                    "[{}] @{}{}: {}\n",
                    to_jst_rfc3339(message.sent_at),
                    message.user,
                    Self::me_suffix(&message.user, me),
                    message.contents
                ));
            }
        }

        output.push_str(&format!("{}\n", DOUBLE_RULE));
        output
    }

    /// Format a chat message
    pub fn format_chat_message(message: &ChatMessageDto, me: &str) -> String {
        format!(
            "\n\n{rule}\n\
             @{}{}: {}\n\
             sent at {}\n\
             {rule}\n",
            message.user,
            Self::me_suffix(&message.user, me),
            message.contents,
            to_jst_rfc3339(message.sent_at),
            rule = RULE,
        )
    }

    /// Format a presence update
    pub fn format_presence(connection_count: usize, online_users: &[String], me: &str) -> String {
        let users = online_users
            .iter()
            .map(|user| format!("{}{}", user, Self::me_suffix(user, me)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "\n* {} connection(s) online: {}\n",
            connection_count,
            if users.is_empty() { "-" } else { users.as_str() }
        )
    }

    pub fn format_room_ended() -> String {
        format!("\n\n{}\nThis chat room has ended.\n{}\n", DOUBLE_RULE, DOUBLE_RULE)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn me_suffix(user: &str, me: &str) -> &'static str {
        if user == me { " (me)" } else { "" }
    }
}
