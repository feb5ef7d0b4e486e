//! Credential resolution for chat clients.
//!
//! Every graph node builds its client the same way, from the same three
//! tiers: an explicit per-request override, then the tenant's stored
//! credential, then the process-wide default. Resolution is stateless —
//! nothing is cached between requests.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;

use crate::llm::credentials::StoredCredential;
use crate::llm::{ChatApi, ChatClient, LlmError, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Per-request override carried in the pipeline config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialOverride {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Everything the factory needs to resolve a client for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub overrides: Option<CredentialOverride>,
    pub stored: Option<StoredCredential>,
}

impl RequestConfig {
    pub fn from_override(api_key: Option<String>, model: Option<String>) -> Self {
        if api_key.is_none() && model.is_none() {
            return RequestConfig::default();
        }
        RequestConfig {
            overrides: Some(CredentialOverride {
                api_key,
                model,
                base_url: None,
            }),
            stored: None,
        }
    }
}

/// Resolves a chat client for a request, or fails with `CredentialMissing`.
/// Trait seam so graph tests can inject scripted clients.
pub trait ClientFactory: Send + Sync {
    fn resolve(&self, config: &RequestConfig) -> Result<Arc<dyn ChatApi>, LlmError>;
}

/// Production factory backed by the process HTTP client and the environment
/// default credential.
pub struct LlmFactory {
    http: Client,
    default_api_key: Option<String>,
    default_model: String,
}

impl LlmFactory {
    pub fn new(http: Client, default_api_key: Option<String>, default_model: Option<String>) -> Self {
        Self {
            http,
            default_api_key,
            default_model: default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

impl ClientFactory for LlmFactory {
    fn resolve(&self, config: &RequestConfig) -> Result<Arc<dyn ChatApi>, LlmError> {
        let overrides = config.overrides.as_ref();
        let stored = config.stored.as_ref();

        // Tier 1: explicit request override. Tier 2: stored tenant key.
        // Tier 3: process default. No credential at any tier is terminal
        // for this request — callers must not retry.
        let api_key = overrides
            .and_then(|o| o.api_key.clone())
            .or_else(|| stored.map(|s| s.api_key.clone()))
            .or_else(|| self.default_api_key.clone())
            .ok_or(LlmError::CredentialMissing)?;

        let model = overrides
            .and_then(|o| o.model.clone())
            .or_else(|| stored.and_then(|s| s.model.clone()))
            .unwrap_or_else(|| self.default_model.clone());

        let base_url = overrides
            .and_then(|o| o.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Arc::new(ChatClient::new(
            self.http.clone(),
            base_url,
            api_key,
            model,
        )))
    }
}
