mod bias;
mod chat;
mod config;
mod corpus;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bias::classifier::BiasClassifier;
use crate::bias::empowerment::EmpowermentTable;
use crate::bias::rules::LexicalRules;
use crate::chat::memory::{InMemorySessionStore, SessionStore};
use crate::chat::orchestrator::{Orchestrator, OrchestratorSettings};
use crate::chat::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::config::Config;
use crate::corpus::build_retriever;
use crate::corpus::loader::{load_events, load_jobs};
use crate::llm_client::embeddings::EmbeddingClient;
use crate::llm_client::{ChatBackend, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Asha API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn ChatBackend> = Arc::new(LlmClient::new(config.openrouter_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Embedding index when OPENAI_API_KEY is set, keyword index otherwise
    let embeddings = match &config.openai_api_key {
        Some(key) => Some(EmbeddingClient::new(key.clone())?),
        None => {
            info!("OPENAI_API_KEY not set, corpora will use the keyword index");
            None
        }
    };

    // Load corpora and build indexes (read-only from here on)
    let jobs = Arc::new(build_retriever(load_jobs(&config.jobs_data_path), embeddings.as_ref()).await);
    let events =
        Arc::new(build_retriever(load_events(&config.events_data_path), embeddings.as_ref()).await);

    // Bias gate lookup tables
    let rules = match &config.bias_rules_path {
        Some(path) => LexicalRules::from_json_file(path)?,
        None => LexicalRules::defaults(),
    };
    info!("Loaded {} lexical bias rules", rules.rule_count());

    let empowerment = match &config.empowerment_resources_path {
        Some(path) => EmpowermentTable::from_json_file(path)?,
        None => EmpowermentTable::defaults(),
    };

    let classifier = Arc::new(BiasClassifier::new(llm.clone(), rules));
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let settings = OrchestratorSettings {
        system_prompt: load_system_prompt(&config),
        history_window_turns: config.history_window_turns,
        llm_timeout: Duration::from_secs(config.llm_timeout_secs),
        retrieval_timeout: Duration::from_secs(config.retrieval_timeout_secs),
    };

    let orchestrator = Arc::new(Orchestrator::new(
        classifier.clone(),
        empowerment,
        jobs.clone(),
        events.clone(),
        llm,
        sessions.clone(),
        settings,
    ));

    // Build app state
    let state = AppState {
        config: config.clone(),
        orchestrator,
        classifier,
        jobs,
        events,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Invalid listen address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reads the assistant persona, falling back to the built-in prompt.
fn load_system_prompt(config: &Config) -> String {
    match std::fs::read_to_string(&config.system_prompt_path) {
        Ok(prompt) if !prompt.trim().is_empty() => {
            info!("Loaded system prompt from {}", config.system_prompt_path.display());
            prompt
        }
        Ok(_) => {
            warn!(
                "System prompt file {} is empty, using built-in prompt",
                config.system_prompt_path.display()
            );
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
        Err(e) => {
            warn!(
                "Could not read system prompt from {}: {e}; using built-in prompt",
                config.system_prompt_path.display()
            );
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}
