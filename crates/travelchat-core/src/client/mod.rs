pub mod http;
pub mod stub;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub use http::HttpAskClient;
pub use stub::StubAskClient;

/// An answer from the chatbot backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskResponse {
    pub answer: String,
    /// Trusted map markup to show in the map view
    pub map_html: Option<String>,
    pub location_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("chatbot endpoint returned status {0}")]
    Status(StatusCode),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a question. The conversation controller only
/// talks to this trait, so the stub and HTTP clients are interchangeable.
#[async_trait]
pub trait AskClient: Send + Sync {
    async fn ask(&self, question: &str) -> Result<AskResponse, AskError>;
}
