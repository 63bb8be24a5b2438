use std::sync::Arc;

use crate::client::{AskClient, HttpAskClient, StubAskClient};
use crate::config::Settings;

/// Which implementation answers questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Http,
    Stub,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Http => "http",
            Backend::Stub => "stub",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Some(Backend::Http),
            "stub" | "mock" => Some(Backend::Stub),
            _ => None,
        }
    }

    pub fn all() -> Vec<Backend> {
        vec![Backend::Http, Backend::Stub]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::Http => "Remote endpoint",
            Backend::Stub => "Offline stub",
        }
    }

    /// The other backend, for toggling between the two
    pub fn next(&self) -> Self {
        match self {
            Backend::Http => Backend::Stub,
            Backend::Stub => Backend::Http,
        }
    }
}

/// Build the client for `backend` using the endpoint and timings in `settings`.
pub fn build_client(backend: Backend, settings: &Settings) -> anyhow::Result<Arc<dyn AskClient>> {
    let client: Arc<dyn AskClient> = match backend {
        Backend::Http => match settings.request_timeout {
            Some(timeout) => Arc::new(HttpAskClient::with_timeout(&settings.endpoint, timeout)?),
            None => Arc::new(HttpAskClient::new(&settings.endpoint)),
        },
        Backend::Stub => Arc::new(StubAskClient::with_delay(settings.stub_delay)),
    };
    tracing::info!(backend = backend.as_str(), endpoint = %settings.endpoint, "built chatbot client");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_round_trip() {
        for backend in Backend::all() {
            assert_eq!(Backend::from_str(backend.as_str()), Some(backend));
        }
        assert_eq!(Backend::from_str(" STUB "), Some(Backend::Stub));
        assert_eq!(Backend::from_str("mock"), Some(Backend::Stub));
        assert_eq!(Backend::from_str("grpc"), None);
    }

    #[test]
    fn test_backend_toggle() {
        assert_eq!(Backend::Http.next(), Backend::Stub);
        assert_eq!(Backend::Stub.next().next(), Backend::Stub);
    }

    #[tokio::test]
    async fn test_build_stub_client_answers() {
        let settings = Settings {
            stub_delay: std::time::Duration::from_millis(1),
            ..Settings::default()
        };
        let client = build_client(Backend::Stub, &settings).unwrap();
        let answer = client.ask("hello").await.unwrap();
        assert!(answer.answer.contains("\"hello\""));
    }
}
