//! Deterministic stand-ins for the external providers, used by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::chat::models::ConversationTurn;
use crate::dataset::Corpus;
use crate::llm_client::{CompletionProvider, LlmError, SamplingParams};
use crate::retrieval::embedding::{EmbeddingError, EmbeddingProvider};
use crate::retrieval::index::SimilarityIndex;
use crate::startup::ReadyState;

const DIMENSIONS: usize = 256;

/// Hashes lowercase word tokens into a fixed-size count vector.
/// Texts sharing words end up with positive cosine similarity.
#[derive(Default)]
pub struct BagOfWordsEmbedder {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl BagOfWordsEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIMENSIONS];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            // FNV-1a
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in token.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
            v[(hash % DIMENSIONS as u64) as usize] += 1.0;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Api {
                status: 503,
                message: "embedding service unavailable".to_string(),
            });
        }
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }
}

/// Completion provider that returns a fixed reply, or fails, and records
/// every message sequence it receives.
pub struct ScriptedCompletion {
    reply: Option<String>,
    received: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl ScriptedCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<Vec<ConversationTurn>> {
        self.received.lock().unwrap().clone()
    }

    pub fn last_messages(&self) -> Vec<ConversationTurn> {
        self.received().pop().expect("completion provider was never called")
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(
        &self,
        messages: &[ConversationTurn],
        _params: &SamplingParams,
    ) -> Result<String, LlmError> {
        self.received.lock().unwrap().push(messages.to_vec());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(LlmError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            }),
        }
    }
}

pub async fn ready_state(pairs: &[(&str, &str)]) -> ReadyState {
    let corpus = Corpus::from_pairs(pairs);
    let index = SimilarityIndex::build(&corpus, Arc::new(BagOfWordsEmbedder::new()))
        .await
        .unwrap();
    ReadyState { corpus, index }
}
