//! Chat-completion client — the single point of entry for all LLM calls.
//!
//! No other module may talk to the chat API directly; graph nodes receive a
//! `dyn ChatApi` resolved by the factory and go through it. Calls are
//! single-shot: a transport failure surfaces immediately to the caller, and
//! retries (if desired) are the caller's responsibility.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod credentials;
pub mod factory;
pub mod sanitize;

use sanitize::ParseFailure;

/// Default chat model when neither the request nor the stored credential
/// names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// OpenAI-compatible gateway all chat and embedding traffic goes through.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("no API credential resolvable for this request")]
    CredentialMissing,

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Minimal chat surface the pipeline graphs depend on. Production code uses
/// `ChatClient`; tests substitute scripted implementations.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends one system+user exchange and returns the raw text reply.
    async fn complete(&self, prompt: &str, system: &str, temperature: f32)
        -> Result<String, LlmError>;
}

/// Calls the model and runs the reply through the output sanitizer into the
/// expected result shape. Free function because trait objects cannot carry
/// generic methods.
pub async fn complete_json<T: DeserializeOwned>(
    client: &dyn ChatApi,
    prompt: &str,
    system: &str,
    temperature: f32,
) -> Result<T, LlmError> {
    let text = client.complete(prompt, system, temperature).await?;
    Ok(sanitize::sanitize_into(&text)?)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Concrete chat client over the OpenAI-compatible completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

/// Builds the shared reqwest client with the outbound-call timeout applied.
pub fn build_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        if let Some(usage) = &chat_response.usage {
            debug!(
                "chat call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                self.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}
