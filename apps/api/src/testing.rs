//! Test doubles shared by the unit tests: scripted generation backend,
//! canned search indexes, and a ready-made `AppState`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::bias::classifier::BiasClassifier;
use crate::bias::empowerment::EmpowermentTable;
use crate::bias::rules::LexicalRules;
use crate::chat::memory::{InMemorySessionStore, SessionStore};
use crate::chat::orchestrator::{Orchestrator, OrchestratorSettings};
use crate::chat::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::config::Config;
use crate::corpus::index::{KeywordIndex, SearchHit, SearchIndex};
use crate::corpus::retriever::CorpusRetriever;
use crate::corpus::sample::{sample_events, sample_jobs};
use crate::corpus::CorpusError;
use crate::llm_client::{ChatBackend, ChatMessage, GenerationParams, LlmError};
use crate::models::CorpusRecord;
use crate::state::AppState;

pub const TEST_API_KEY: &str = "test-secret";

// ────────────────────────────────────────────────────────────────────────────
// Search indexes
// ────────────────────────────────────────────────────────────────────────────

/// An engine that is always down.
pub struct FailingIndex;

#[async_trait]
impl SearchIndex for FailingIndex {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<SearchHit>, CorpusError> {
        Err(CorpusError::Search("index unavailable".to_string()))
    }
}

/// An engine that is up but never finds anything.
pub struct EmptyIndex {
    delay: Option<Duration>,
}

impl EmptyIndex {
    pub fn new() -> Self {
        Self { delay: None }
    }

    /// Answers after `delay`; used to trip retrieval deadlines.
    pub fn slow(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }
}

#[async_trait]
impl SearchIndex for EmptyIndex {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<SearchHit>, CorpusError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Vec::new())
    }
}

pub fn keyword_retriever<T: CorpusRecord>(records: Vec<T>) -> CorpusRetriever<T> {
    let texts: Vec<String> = records.iter().map(CorpusRecord::descriptive_text).collect();
    CorpusRetriever::new(records, Arc::new(KeywordIndex::build(&texts)))
}

// ────────────────────────────────────────────────────────────────────────────
// Generation backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Timeout,
    Hang,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

/// Backend with one canned reply for JSON-mode calls (the bias classifier)
/// and one for free-text calls (generation). Unscripted calls fail with a
/// 503 so the caller's fallback path runs.
pub struct ScriptedBackend {
    json: Option<Reply>,
    text: Option<Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            json: None,
            text: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_json(mut self, reply: &str) -> Self {
        self.json = Some(Reply::Text(reply.to_string()));
        self
    }

    pub fn with_text(mut self, reply: &str) -> Self {
        self.text = Some(Reply::Text(reply.to_string()));
        self
    }

    /// Generation calls fail with a transport timeout.
    pub fn with_text_timeout(mut self) -> Self {
        self.text = Some(Reply::Timeout);
        self
    }

    /// Generation calls never answer.
    pub fn with_text_hang(mut self) -> Self {
        self.text = Some(Reply::Hang);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of free-text (generation) calls received.
    pub fn generation_calls(&self) -> usize {
        self.calls().iter().filter(|c| !c.params.json_mode).count()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            params: params.clone(),
        });

        let reply = if params.json_mode { &self.json } else { &self.text };
        match reply.clone() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Timeout) => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Err(LlmError::Timeout)
            }
            Some(Reply::Hang) => {
                std::future::pending::<()>().await;
                Err(LlmError::Timeout)
            }
            None => Err(LlmError::Api {
                status: 503,
                message: "backend not scripted".to_string(),
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Application wiring
// ────────────────────────────────────────────────────────────────────────────

pub fn test_settings() -> OrchestratorSettings {
    OrchestratorSettings {
        system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        history_window_turns: 10,
        llm_timeout: Duration::from_secs(60),
        retrieval_timeout: Duration::from_secs(15),
    }
}

pub fn test_config() -> Config {
    Config {
        openrouter_api_key: "test-openrouter".to_string(),
        openai_api_key: None,
        api_key: TEST_API_KEY.to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        jobs_data_path: "missing/jobs.json".into(),
        events_data_path: "missing/events.json".into(),
        system_prompt_path: "missing/system_prompt.md".into(),
        bias_rules_path: None,
        empowerment_resources_path: None,
        history_window_turns: 10,
        llm_timeout_secs: 60,
        retrieval_timeout_secs: 15,
    }
}

/// Full application state over the sample corpora and keyword indexes.
pub fn test_state(backend: Arc<dyn ChatBackend>) -> AppState {
    let today = chrono::Utc::now().date_naive();
    let jobs = Arc::new(keyword_retriever(sample_jobs()));
    let events = Arc::new(keyword_retriever(sample_events(today)));
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let classifier = Arc::new(BiasClassifier::new(backend.clone(), LexicalRules::defaults()));

    let orchestrator = Orchestrator::new(
        classifier.clone(),
        EmpowermentTable::defaults(),
        jobs.clone(),
        events.clone(),
        backend,
        sessions.clone(),
        test_settings(),
    );

    AppState {
        config: test_config(),
        orchestrator: Arc::new(orchestrator),
        classifier,
        jobs,
        events,
        sessions,
    }
}
