//! Cosine similarity and per-document ranking.
//!
//! Documents are ranked by the maximum similarity over their chunks: one
//! strongly matching section should surface the whole document. Ties break
//! toward the most recently stored document.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A chunk already scoped to one tenant, scored against a query vector.
#[derive(Debug, Clone)]
pub struct ChunkHit {
    pub document_id: Uuid,
    pub filename: String,
    pub text: String,
    pub score: f32,
    pub created_at: DateTime<Utc>,
}

/// A document with its aggregated score and best-matching chunk.
#[derive(Debug, Clone)]
pub struct DocumentHit {
    pub document_id: Uuid,
    pub filename: String,
    pub score: f32,
    pub best_chunk: String,
    pub created_at: DateTime<Utc>,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Aggregates scored chunks into ranked documents: max over chunks, score
/// descending, `created_at` descending on ties, truncated to `k`.
pub fn rank_documents(hits: Vec<ChunkHit>, k: usize) -> Vec<DocumentHit> {
    let mut by_document: Vec<DocumentHit> = Vec::new();
    for hit in hits {
        match by_document
            .iter_mut()
            .find(|d| d.document_id == hit.document_id)
        {
            Some(existing) => {
                if hit.score > existing.score {
                    existing.score = hit.score;
                    existing.best_chunk = hit.text;
                }
                if hit.created_at > existing.created_at {
                    existing.created_at = hit.created_at;
                }
            }
            None => by_document.push(DocumentHit {
                document_id: hit.document_id,
                filename: hit.filename,
                score: hit.score,
                best_chunk: hit.text,
                created_at: hit.created_at,
            }),
        }
    }

    by_document.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    by_document.truncate(k);
    by_document
}
