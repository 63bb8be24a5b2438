pub mod backend;
pub mod client;
pub mod config;
pub mod conversation;
pub mod format;
pub mod state;

// Re-export main types for convenience
pub use backend::{build_client, Backend};
pub use client::{AskClient, AskError, AskResponse, HttpAskClient, StubAskClient};
pub use config::{Config, Settings};
pub use conversation::{Conversation, ReplyOutcome, Submission, FALLBACK_MESSAGE};
pub use format::{
    format_message, format_with_location, DisplaySegment, EmphasisPart, FormattedMessage,
    HighlightPart,
};
pub use state::{ChatMessage, ChatRole, ConversationState};
