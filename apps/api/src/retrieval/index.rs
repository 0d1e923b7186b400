//! Similarity Index — embeds every CV record once at startup and answers
//! nearest-neighbour queries by cosine similarity.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dataset::Corpus;
use crate::retrieval::embedding::{EmbeddingError, EmbeddingProvider};

/// Number of matches fetched per question when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 3;

/// A stored document vector, keyed by the record id it was built from.
#[derive(Debug, Clone)]
struct IndexedDocument {
    record_id: usize,
    embedding: Vec<f32>,
}

/// Read-only after `build`. Queries embed through the same provider used for
/// the documents so both sides share one vector space.
pub struct SimilarityIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    documents: Vec<IndexedDocument>,
}

impl SimilarityIndex {
    /// Embeds `"{question} {answer}"` for every record. Any provider failure is fatal.
    pub async fn build(
        corpus: &Corpus,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, EmbeddingError> {
        let texts: Vec<String> = corpus.records().iter().map(|r| r.search_document()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts).await?
        };

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let documents = corpus
            .records()
            .iter()
            .zip(vectors)
            .map(|(record, embedding)| IndexedDocument {
                record_id: record.id,
                embedding,
            })
            .collect::<Vec<_>>();

        info!("Similarity index built with {} documents", documents.len());
        Ok(Self {
            embedder,
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns up to `k` record ids, most similar first.
    ///
    /// Never fails: a provider error or a malformed query vector yields an empty
    /// result, which callers treat as "no relevant examples".
    pub async fn query(&self, text: &str, k: usize) -> Vec<usize> {
        if k == 0 || self.documents.is_empty() {
            return Vec::new();
        }

        let query_vector = match self.embedder.embed(text).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Similarity query failed, continuing without matches: {e}");
                return Vec::new();
            }
        };

        let mut scored = Vec::with_capacity(self.documents.len());
        for doc in &self.documents {
            if doc.embedding.len() != query_vector.len() {
                warn!(
                    "Query embedding has {} dimensions, index has {}; skipping retrieval",
                    query_vector.len(),
                    doc.embedding.len()
                );
                return Vec::new();
            }
            scored.push((doc.record_id, cosine_similarity(&doc.embedding, &query_vector)));
        }

        debug!(scores = ?scored, "similarity query");
        rank(scored, k)
    }
}

/// Orders `(record_id, score)` pairs best first and keeps `k`.
/// NaN scores rank below every real score; equal scores keep corpus order.
fn rank(mut scored: Vec<(usize, f32)>, k: usize) -> Vec<usize> {
    for (_, score) in scored.iter_mut() {
        if score.is_nan() {
            *score = f32::NEG_INFINITY;
        }
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    scored.into_iter().map(|(id, _)| id).collect()
}

/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
