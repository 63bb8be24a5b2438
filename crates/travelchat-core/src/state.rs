//! UI-agnostic conversation state types
//!
//! These are shared between the controller and whatever view renders the
//! conversation, and don't depend on any specific UI framework.

use serde::{Deserialize, Serialize};

/// A chat message in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Everything the views need to know about the conversation.
///
/// `map_html` and `location_name` are only replaced when an answer carries map
/// content; answers without a map leave the previous map in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
    pub map_html: Option<String>,
    pub location_name: Option<String>,
}

impl ConversationState {
    pub fn has_map(&self) -> bool {
        self.map_html.is_some()
    }
}
