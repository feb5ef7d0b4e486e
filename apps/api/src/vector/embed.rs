//! Embedding client over the OpenAI-compatible `/embeddings` endpoint.
//!
//! Uncached texts go out in one batched call; vectors come back in input
//! order. Endpoint failures surface as `RetrievalError::Unavailable` — a
//! distinct condition from an empty search result.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::vector::cache::{CacheKey, EmbeddingCache};

/// Embedding model used unless configured otherwise.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Dimensionality every stored vector must have.
pub const EMBEDDING_DIM: usize = 1536;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("no embedding credential configured")]
    CredentialMissing,

    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding dimensionality mismatch: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    default_api_key: Option<String>,
    model: String,
    cache: EmbeddingCache,
}

impl EmbeddingClient {
    pub fn new(
        client: Client,
        base_url: String,
        default_api_key: Option<String>,
        model: Option<String>,
    ) -> Self {
        let model = model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        Self {
            client,
            base_url,
            default_api_key,
            model: qualify_model(&model),
            cache: EmbeddingCache::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn resolve_key<'a>(&'a self, api_key: Option<&'a str>) -> Result<&'a str, RetrievalError> {
        api_key
            .or(self.default_api_key.as_deref())
            .ok_or(RetrievalError::CredentialMissing)
    }

    /// Embeds one query string.
    pub async fn embed_one(
        &self,
        text: &str,
        api_key: Option<&str>,
    ) -> Result<Arc<Vec<f32>>, RetrievalError> {
        let mut vectors = self.embed(std::slice::from_ref(&text), api_key).await?;
        Ok(vectors.remove(0))
    }

    /// Embeds a batch, returning vectors in the same order as `texts`.
    /// Cache hits are served locally; the remainder goes out in one call.
    pub async fn embed<S: AsRef<str>>(
        &self,
        texts: &[S],
        api_key: Option<&str>,
    ) -> Result<Vec<Arc<Vec<f32>>>, RetrievalError> {
        let key = self.resolve_key(api_key)?;

        let mut resolved: Vec<Option<Arc<Vec<f32>>>> = Vec::with_capacity(texts.len());
        let mut missing: Vec<usize> = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let cache_key = CacheKey::new(key, &self.model, text.as_ref());
            match self.cache.get(&cache_key) {
                Some(vector) => resolved.push(Some(vector)),
                None => {
                    resolved.push(None);
                    missing.push(i);
                }
            }
        }

        if !missing.is_empty() {
            debug!(
                "embedding batch: {} cached, {} to fetch (model={})",
                texts.len() - missing.len(),
                missing.len(),
                self.model
            );
            let inputs: Vec<&str> = missing.iter().map(|&i| texts[i].as_ref()).collect();
            let vectors = self.fetch(&inputs, key).await?;
            for (&text_index, vector) in missing.iter().zip(vectors) {
                let cache_key = CacheKey::new(key, &self.model, texts[text_index].as_ref());
                resolved[text_index] = Some(self.cache.insert(cache_key, vector));
            }
        }

        Ok(resolved.into_iter().map(|v| v.expect("all slots filled")).collect())
    }

    async fn fetch(&self, inputs: &[&str], api_key: &str) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: inputs,
            })
            .send()
            .await
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Unavailable(format!(
                "embedding endpoint returned {status}: {body}"
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;

        if parsed.data.len() != inputs.len() {
            return Err(RetrievalError::Unavailable(format!(
                "embedding endpoint returned {} vectors for {} inputs",
                parsed.data.len(),
                inputs.len()
            )));
        }

        // The endpoint may reorder; the index field is authoritative.
        parsed.data.sort_by_key(|d| d.index);
        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();
        for vector in &vectors {
            if vector.len() != EMBEDDING_DIM {
                return Err(RetrievalError::Dimension {
                    expected: EMBEDDING_DIM,
                    got: vector.len(),
                });
            }
        }
        Ok(vectors)
    }
}

/// The gateway expects provider-qualified model names; bare OpenAI names get
/// the `openai/` prefix.
fn qualify_model(model: &str) -> String {
    if model.contains('/') {
        model.to_string()
    } else {
        format!("openai/{model}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_bare_model_name() {
        assert_eq!(
            qualify_model("text-embedding-3-small"),
            "openai/text-embedding-3-small"
        );
    }

    #[test]
    fn test_qualified_model_name_unchanged() {
        assert_eq!(
            qualify_model("voyage/voyage-3-lite"),
            "voyage/voyage-3-lite"
        );
    }

    #[test]
    fn test_missing_credential_is_distinct_error() {
        let client = EmbeddingClient::new(
            Client::new(),
            "http://localhost:0".to_string(),
            None,
            None,
        );
        let err = client.resolve_key(None).unwrap_err();
        assert!(matches!(err, RetrievalError::CredentialMissing));
    }

    #[test]
    fn test_explicit_key_wins_over_default() {
        let client = EmbeddingClient::new(
            Client::new(),
            "http://localhost:0".to_string(),
            Some("sk-default".to_string()),
            None,
        );
        assert_eq!(client.resolve_key(Some("sk-header")).unwrap(), "sk-header");
        assert_eq!(client.resolve_key(None).unwrap(), "sk-default");
    }
}
