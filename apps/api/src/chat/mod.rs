// CV chat: prompt composition, conversation orchestration, and the /chat handler.
// All completion calls go through llm_client — no direct API calls here.

pub mod composer;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
