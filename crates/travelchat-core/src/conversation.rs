//! Conversation state controller
//!
//! Owns the message log and map state, and runs at most one question against
//! the chatbot at a time. The request runs on a spawned task so the UI keeps
//! handling events; the owner polls for the reply with [`Conversation::poll_reply`].

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::client::{AskClient, AskError, AskResponse};
use crate::state::{ChatMessage, ConversationState};

/// Shown in place of an answer whenever the request fails
pub const FALLBACK_MESSAGE: &str = "Sorry, I couldn't process your request.";

/// What happened to a submitted question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Sent,
    /// Blank input; nothing changed
    Empty,
    /// A previous question is still in flight; nothing changed
    Busy,
}

/// How an in-flight question resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Answered { has_map: bool },
    Failed,
}

type AskTask = JoinHandle<Result<AskResponse, AskError>>;

pub struct Conversation {
    client: Arc<dyn AskClient>,
    state: ConversationState,
    in_flight: Option<AskTask>,
}

impl Conversation {
    pub fn new(client: Arc<dyn AskClient>) -> Self {
        Self {
            client,
            state: ConversationState::default(),
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending
    }

    /// Swap the backend. A question already in flight still completes
    /// against the old client.
    pub fn set_client(&mut self, client: Arc<dyn AskClient>) {
        self.client = client;
    }

    /// Record the question and start asking it. Must be called from within a
    /// tokio runtime.
    pub fn submit(&mut self, question: &str) -> Submission {
        if question.trim().is_empty() {
            return Submission::Empty;
        }
        if self.in_flight.is_some() {
            tracing::debug!("question submitted while another is pending, ignoring");
            return Submission::Busy;
        }

        self.state.messages.push(ChatMessage::user(question));
        self.state.pending = true;

        let client = Arc::clone(&self.client);
        let question = question.to_string();
        self.in_flight = Some(tokio::spawn(async move { client.ask(&question).await }));

        Submission::Sent
    }

    /// Apply the reply if the in-flight request has finished. Returns `None`
    /// when nothing was pending or the request is still running.
    pub async fn poll_reply(&mut self) -> Option<ReplyOutcome> {
        if !self.in_flight.as_ref()?.is_finished() {
            return None;
        }
        self.wait_reply().await
    }

    /// Wait for the in-flight request, if any, and apply its reply.
    pub async fn wait_reply(&mut self) -> Option<ReplyOutcome> {
        let task = self.in_flight.take()?;
        let result = match task.await {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(join_error) => Err(anyhow::Error::from(join_error)),
        };
        Some(self.apply_reply(result))
    }

    fn apply_reply(&mut self, result: anyhow::Result<AskResponse>) -> ReplyOutcome {
        let outcome = match result {
            Ok(response) => {
                self.state.messages.push(ChatMessage::assistant(response.answer));
                let has_map = response.map_html.is_some();
                if has_map {
                    self.state.map_html = response.map_html;
                    self.state.location_name = response.location_name;
                }
                ReplyOutcome::Answered { has_map }
            }
            Err(e) => {
                tracing::warn!(error = %e, "question failed");
                self.state.messages.push(ChatMessage::assistant(FALLBACK_MESSAGE));
                ReplyOutcome::Failed
            }
        };
        self.state.pending = false;
        outcome
    }
}
