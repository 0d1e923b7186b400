use std::str::FromStr;

use anyhow::{Context, Result};

use crate::retrieval::index::DEFAULT_TOP_K;

/// Application configuration loaded from environment variables.
/// Startup aborts if a required variable is missing or a number fails to parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub dataset_path: String,
    /// Person the CV dataset describes. Appears in every prompt fragment.
    pub subject_name: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub retrieval_top_k: usize,
    pub max_history_turns: usize,
    pub max_turn_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            dataset_path: std::env::var("CV_DATASET_PATH")
                .unwrap_or_else(|_| "data/cv_dataset.json".to_string()),
            subject_name: std::env::var("CV_SUBJECT_NAME").unwrap_or_else(|_| "Mathieu".to_string()),
            chat_model: std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            retrieval_top_k: parse_env("RETRIEVAL_TOP_K", DEFAULT_TOP_K)?,
            max_history_turns: parse_env("MAX_HISTORY_TURNS", 40)?,
            max_turn_chars: parse_env("MAX_TURN_CHARS", 4000)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit tests; never reads the environment.
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            dataset_path: "data/cv_dataset.json".to_string(),
            subject_name: "Mathieu".to_string(),
            chat_model: "gpt-test".to_string(),
            embedding_model: "embed-test".to_string(),
            retrieval_top_k: DEFAULT_TOP_K,
            max_history_turns: 4,
            max_turn_chars: 200,
        }
    }
}
