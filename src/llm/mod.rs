//! Generative reply client.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint. Each call is
//! context-free: the model sees only the current utterance, never prior
//! turns.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;

pub struct GenerativeClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

impl GenerativeClient {
    pub fn new(cfg: &LlmConfig) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Request one continuation for `prompt`, capped at `max_tokens`.
    /// Returns the raw model text; the dispatcher strips any prompt echo.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };

        debug!(model = %self.model, max_tokens, "Generative request");

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.context("Generative request failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Generative API error {}: {}", status, body);
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .context("Failed to parse generative response")?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::GENERATION_MAX_TOKENS;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GenerativeClient {
        GenerativeClient::new(&LlmConfig {
            base_url: server.uri(),
            model: "test-model".into(),
            api_key: None,
        })
    }

    #[tokio::test]
    async fn sends_the_turn_token_cap_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 50,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "I'm doing well."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let reply = client
            .generate("how are you", GENERATION_MAX_TOKENS)
            .await
            .unwrap();
        assert_eq!(reply, "I'm doing well.");
    }

    #[tokio::test]
    async fn empty_choices_yield_empty_continuation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let reply = client.generate("anything", 50).await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn api_error_propagates_as_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate("anything", 50).await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
