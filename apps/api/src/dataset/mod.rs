//! Dataset Loader — reads the CV question/answer file once at startup.
//!
//! Each record receives a dense 0-based `id` in file order. The id travels with
//! the record into the similarity index and back, so a search hit dereferences
//! into the corpus without any positional translation.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not a JSON array of {{question, answer}} objects: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record {index} has an empty '{field}' field")]
    EmptyField { index: usize, field: &'static str },
}

/// One immutable question/answer pair from the CV dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvRecord {
    pub id: usize,
    pub question: String,
    pub answer: String,
}

impl CvRecord {
    /// Text handed to the embedding provider for this record.
    pub fn search_document(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    question: String,
    answer: String,
}

/// Load-once, read-only collection of CV records in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<CvRecord>,
}

impl Corpus {
    pub fn get(&self, id: usize) -> Option<&CvRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> &[CvRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads and parses the dataset file. Any failure is fatal to startup.
pub fn load(path: impl AsRef<Path>) -> Result<Corpus, DatasetError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let corpus = parse(&raw)?;
    if corpus.is_empty() {
        warn!("Dataset {} contains no records", path.display());
    }
    info!("Loaded {} CV records from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Parses a JSON array of `{question, answer}` objects, assigning ids in order.
pub fn parse(raw: &str) -> Result<Corpus, DatasetError> {
    let raw_records: Vec<RawRecord> = serde_json::from_str(raw)?;

    let records = raw_records
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            if r.question.trim().is_empty() {
                return Err(DatasetError::EmptyField {
                    index,
                    field: "question",
                });
            }
            if r.answer.trim().is_empty() {
                return Err(DatasetError::EmptyField {
                    index,
                    field: "answer",
                });
            }
            Ok(CvRecord {
                id: index,
                question: r.question,
                answer: r.answer,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Corpus { records })
}

#[cfg(test)]
impl Corpus {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let records = pairs
            .iter()
            .enumerate()
            .map(|(id, (q, a))| CvRecord {
                id,
                question: q.to_string(),
                answer: a.to_string(),
            })
            .collect();
        Corpus { records }
    }
}
