//! Process-wide embedding cache.
//!
//! Embeddings for identical (credential, model, text) are assumed stable, so
//! entries are never invalidated — the cache lives and dies with the
//! process. Concurrent invocations share it behind a mutex; a race that
//! recomputes an embedding is wasteful, not incorrect.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    credential: [u8; 32],
    model: String,
    text_hash: [u8; 32],
}

impl CacheKey {
    pub fn new(credential: &str, model: &str, text: &str) -> Self {
        CacheKey {
            credential: digest(credential.as_bytes()),
            model: model.to_string(),
            text_hash: digest(text.as_bytes()),
        }
    }
}

fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

#[derive(Default)]
pub struct EmbeddingCache {
    entries: Mutex<HashMap<CacheKey, Arc<Vec<f32>>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Vec<f32>>> {
        self.entries.lock().expect("embedding cache poisoned").get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, vector: Vec<f32>) -> Arc<Vec<f32>> {
        let vector = Arc::new(vector);
        self.entries
            .lock()
            .expect("embedding cache poisoned")
            .insert(key, Arc::clone(&vector));
        vector
    }
}
