use std::sync::Arc;

use crate::chat::orchestrator::ChatSettings;
use crate::llm_client::CompletionProvider;
use crate::startup::ReadyState;

/// Whether startup retrieval has completed. Set once before the router is
/// built; handlers only ever read it.
#[derive(Clone)]
pub enum Readiness {
    #[allow(dead_code)] // main only serves after initialize succeeds
    NotReady,
    Ready(Arc<ReadyState>),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }

    pub fn knowledge(&self) -> Option<&ReadyState> {
        match self {
            Readiness::Ready(state) => Some(state.as_ref()),
            Readiness::NotReady => None,
        }
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Readiness,
    /// Pluggable completion backend. Default: `LlmClient` (OpenAI chat completions).
    pub llm: Arc<dyn CompletionProvider>,
    pub chat: ChatSettings,
}
