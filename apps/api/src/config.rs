use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    /// Enables the embedding index when present. Keyword index otherwise.
    pub openai_api_key: Option<String>,
    /// Shared secret expected in the `api-key` header of protected routes.
    pub api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub jobs_data_path: PathBuf,
    pub events_data_path: PathBuf,
    pub system_prompt_path: PathBuf,
    pub bias_rules_path: Option<PathBuf>,
    pub empowerment_resources_path: Option<PathBuf>,
    pub history_window_turns: usize,
    pub llm_timeout_secs: u64,
    pub retrieval_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            api_key: require_env("ASHA_API_KEY")?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            jobs_data_path: optional_env("JOBS_DATA_PATH")
                .unwrap_or_else(|| "data/job_listing_data.csv".to_string())
                .into(),
            events_data_path: optional_env("EVENTS_DATA_PATH")
                .unwrap_or_else(|| "data/events.json".to_string())
                .into(),
            system_prompt_path: optional_env("SYSTEM_PROMPT_PATH")
                .unwrap_or_else(|| "system_prompt.md".to_string())
                .into(),
            bias_rules_path: optional_env("BIAS_RULES_PATH").map(PathBuf::from),
            empowerment_resources_path: optional_env("EMPOWERMENT_RESOURCES_PATH")
                .map(PathBuf::from),
            history_window_turns: parse_env("HISTORY_WINDOW_TURNS", 10)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
            retrieval_timeout_secs: parse_env("RETRIEVAL_TIMEOUT_SECS", 15)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}
