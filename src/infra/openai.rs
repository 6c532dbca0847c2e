use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ProviderSettings;
use crate::error::ProviderError;
use crate::services::CompletionProvider;

const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// Chat-completion client. The credential is fixed at construction.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    settings: ProviderSettings,
}

impl OpenAiClient {
    pub fn new(api_key: String, settings: ProviderSettings) -> Self {
        Self {
            http: Client::new(),
            api_key,
            settings,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!(
            url = %self.settings.api_url,
            model = %self.settings.model,
            "requesting completion"
        );

        let response = self
            .http
            .post(self.settings.api_url.as_str())
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|err| ProviderError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            warn!(status = status.as_u16(), "provider rejected completion request");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| ProviderError::Network(err.to_string()))?;
        extract_content(&body)
    }
}

/// Pulls `choices[0].message.content` out of a response body.
fn extract_content(body: &str) -> Result<String, ProviderError> {
    let payload: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
    payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            ProviderError::MalformedResponse("response contained no message content".to_string())
        })
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    fn client_for(api_url: String) -> OpenAiClient {
        let settings = ProviderSettings {
            api_url,
            ..ProviderSettings::default()
        };
        OpenAiClient {
            http: Client::builder().no_proxy().build().expect("client"),
            api_key: "sk-test".to_string(),
            settings,
        }
    }

    /// Answers a single request with `status_line` and `body`; the handle yields the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}/v1/chat/completions"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = socket.read(&mut chunk).await.expect("read");
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let err = client_for(format!("http://{addr}/v1/chat/completions"))
            .complete("Task: x")
            .await
            .expect_err("should fail");
        assert!(matches!(err, ProviderError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"error":"invalid api key"}"#).await;

        let err = client_for(url).complete("Task: x").await.expect_err("should fail");
        server.await.expect("server");

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid api key"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_response_returns_content_and_sends_bearer_token() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"Title: Done"}}]}"#,
        )
        .await;

        let content = client_for(url).complete("Task: ship it").await.expect("content");
        let request = server.await.expect("server").to_lowercase();

        assert_eq!(content, "Title: Done");
        assert!(request.starts_with("post /v1/chat/completions"));
        assert!(request.contains("authorization: bearer sk-test"));
        assert!(request.contains("task: ship it"));
    }

    #[test]
    fn request_body_carries_prompt_and_settings() {
        let client = OpenAiClient::new("sk-test".to_string(), ProviderSettings::default());
        let value = serde_json::to_value(client.request_body("Task: add search")).expect("json");
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["max_tokens"], 400);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], SYSTEM_MESSAGE);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "Task: add search");
        let temperature = value["temperature"].as_f64().expect("number");
        assert!((temperature - 0.4).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Title: A"}},{"message":{"content":"Title: B"}}]}"#;
        assert_eq!(extract_content(body).expect("content"), "Title: A");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let err = extract_content(r#"{"choices":[]}"#).expect_err("should fail");
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn null_content_is_malformed() {
        let err = extract_content(r#"{"choices":[{"message":{"content":null}}]}"#)
            .expect_err("should fail");
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = extract_content("<html>bad gateway</html>").expect_err("should fail");
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
