use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{AskClient, AskError, AskResponse};

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct AskResponseBody {
    response: String,
    #[serde(default, deserialize_with = "optional_text")]
    map_html: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    location_name: Option<String>,
}

/// Missing, null, empty or non-string values all count as absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Talks to the chatbot's `/ask` endpoint
#[derive(Clone)]
pub struct HttpAskClient {
    client: Client,
    base_url: String,
}

impl HttpAskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AskClient for HttpAskClient {
    async fn ask(&self, question: &str) -> Result<AskResponse, AskError> {
        let url = format!("{}/ask", self.base_url);
        let transport = |source| AskError::Transport {
            url: url.clone(),
            source,
        };

        tracing::debug!(%url, "sending question");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(AskError::Status(response.status()));
        }

        let bytes = response.bytes().await.map_err(transport)?;
        let body: AskResponseBody = serde_json::from_slice(&bytes)?;

        Ok(AskResponse {
            answer: body.response,
            map_html: body.map_html,
            location_name: body.location_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Accept one connection, answer it with `status` and `body`, and hand
    /// back the raw request that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_ask_posts_question_and_parses_answer() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"response":"Paris is great","map_html":"<div>map</div>","location_name":"Paris"}"#,
        )
        .await;

        let client = HttpAskClient::new(&url);
        let answer = client.ask("Where should I go?").await.unwrap();

        assert_eq!(answer.answer, "Paris is great");
        assert_eq!(answer.map_html.as_deref(), Some("<div>map</div>"));
        assert_eq!(answer.location_name.as_deref(), Some("Paris"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /ask HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"question":"Where should I go?"}"#));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_endpoint() {
        let (url, server) = serve_once("200 OK", r#"{"response":"ok"}"#).await;
        let client = HttpAskClient::new(&format!("{}/", url));
        assert_eq!(client.base_url(), url);

        client.ask("hi").await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /ask "));
    }

    #[tokio::test]
    async fn test_optional_fields_missing_or_malformed() {
        let (url, _server) = serve_once(
            "200 OK",
            r#"{"response":"No map","map_html":null,"location_name":42}"#,
        )
        .await;
        let answer = HttpAskClient::new(&url).ask("q").await.unwrap();
        assert_eq!(answer.answer, "No map");
        assert_eq!(answer.map_html, None);
        assert_eq!(answer.location_name, None);

        let (url, _server) = serve_once("200 OK", r#"{"response":"x","map_html":""}"#).await;
        let answer = HttpAskClient::new(&url).ask("q").await.unwrap();
        assert_eq!(answer.map_html, None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (url, _server) = serve_once("500 Internal Server Error", "{}").await;
        let err = HttpAskClient::new(&url).ask("q").await.unwrap_err();
        assert!(matches!(err, AskError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_missing_response_field_is_decode_error() {
        let (url, _server) = serve_once("200 OK", r#"{"answer":"wrong key"}"#).await;
        let err = HttpAskClient::new(&url).ask("q").await.unwrap_err();
        assert!(matches!(err, AskError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpAskClient::new(&format!("http://{}", addr))
            .ask("q")
            .await
            .unwrap_err();
        assert!(matches!(err, AskError::Transport { .. }));
    }
}
