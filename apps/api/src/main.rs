mod chat;
mod config;
mod dataset;
mod errors;
mod llm_client;
mod retrieval;
mod routes;
mod startup;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::orchestrator::ChatSettings;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::retrieval::embedding::OpenAiEmbedder;
use crate::routes::build_router;
use crate::state::{AppState, Readiness};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV chat API v{}", env!("CARGO_PKG_VERSION"));

    // Embeddings provider
    let embedder = Arc::new(OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        config.embedding_model.clone(),
    )?);
    info!("Embedding client initialized (model: {})", config.embedding_model);

    // Completion provider
    let llm = LlmClient::new(config.openai_api_key.clone(), config.chat_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    // Corpus + similarity index; any failure aborts before listening
    let ready = startup::initialize(&config, embedder).await?;

    let state = AppState {
        readiness: Readiness::Ready(Arc::new(ready)),
        llm: Arc::new(llm),
        chat: ChatSettings::from(&config),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
