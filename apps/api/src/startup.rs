//! Two-phase startup: build the corpus and similarity index, then serve.
//! A failure here ends the process before the listener is bound.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::dataset::{self, Corpus, DatasetError};
use crate::retrieval::embedding::{EmbeddingError, EmbeddingProvider};
use crate::retrieval::index::SimilarityIndex;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("dataset load failed: {0}")]
    Dataset(#[from] DatasetError),

    #[error("similarity index build failed: {0}")]
    Index(#[from] EmbeddingError),
}

/// Everything retrieval needs, produced once and read-only afterwards.
pub struct ReadyState {
    pub corpus: Corpus,
    pub index: SimilarityIndex,
}

pub async fn initialize(
    config: &Config,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<ReadyState, StartupError> {
    let corpus = dataset::load(&config.dataset_path)?;
    let index = SimilarityIndex::build(&corpus, embedder).await?;
    info!(
        records = corpus.len(),
        documents = index.len(),
        "retrieval initialized"
    );
    Ok(ReadyState { corpus, index })
}
