use std::time::Duration;

use async_trait::async_trait;

use super::{AskClient, AskError, AskResponse};

pub const DEFAULT_STUB_DELAY: Duration = Duration::from_millis(1000);

/// Offline stand-in for the chatbot endpoint. Waits a fixed delay, then echoes
/// the question back in a canned answer with no map.
#[derive(Debug, Clone)]
pub struct StubAskClient {
    delay: Duration,
}

impl StubAskClient {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_STUB_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn answer_for(question: &str) -> String {
        format!(
            "Here's a mock response to your question: \"{}\". In a real app, this would come from a backend API.",
            question
        )
    }
}

impl Default for StubAskClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AskClient for StubAskClient {
    async fn ask(&self, question: &str) -> Result<AskResponse, AskError> {
        tokio::time::sleep(self.delay).await;
        Ok(AskResponse {
            answer: Self::answer_for(question),
            map_html: None,
            location_name: None,
        })
    }
}
