//! Conversation orchestrator — runs one query through the bias gate and
//! exactly one of the two branches, then records the exchange.
//!
//! Branches:
//!   Empowerment — biased query: fixed counter-narrative plus context built
//!                 from the reframed query. The generation backend is not called.
//!   Generation  — unbiased query: context built from the original query,
//!                 response generated by the backend and returned verbatim.
//!
//! Any failure after the query is accepted produces a degraded bundle. The
//! (user, response) pair is appended to the session on every path.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::composer::{
    event_context, job_context, ContextBlock, EventFraming, EVENT_CONTEXT_TOP_K,
    JOB_CONTEXT_TOP_K, UPCOMING_FALLBACK_LIMIT,
};
use super::memory::SessionStore;
use super::models::{Query, ResponseBundle, Turn};
use super::prompts::{annotate_query, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::bias::classifier::BiasClassifier;
use crate::bias::empowerment::EmpowermentTable;
use crate::bias::models::BiasAssessment;
use crate::corpus::retriever::CorpusRetriever;
use crate::llm_client::{ChatBackend, ChatMessage, GenerationParams, LlmError};
use crate::models::{EventRecord, JobRecord, Ranked};

/// Size of the `job_recommendations` list.
pub const RECOMMENDATION_TOP_K: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    JobRetrieval,
    EventRetrieval,
    Generation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::JobRetrieval => "job retrieval",
            Stage::EventRetrieval => "event retrieval",
            Stage::Generation => "generation",
        })
    }
}

/// Failures that end a pipeline run. Never leaves the orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("{stage} exceeded its {}s deadline", limit.as_secs())]
    Deadline { stage: Stage, limit: Duration },
}

impl PipelineError {
    fn stage(&self) -> Stage {
        match self {
            PipelineError::Generation(_) => Stage::Generation,
            PipelineError::Deadline { stage, .. } => *stage,
        }
    }
}

/// Outcome of the bias gate. Exactly one branch runs per query.
#[derive(Debug)]
enum Branch {
    Empowerment(BiasAssessment),
    Generation,
}

impl Branch {
    fn select(assessment: BiasAssessment) -> Self {
        if assessment.has_bias {
            Branch::Empowerment(assessment)
        } else {
            Branch::Generation
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Branch::Empowerment(_) => "empowerment",
            Branch::Generation => "generation",
        }
    }
}

/// Both context blocks plus the recommendation list for one search text.
struct Retrieved {
    jobs: ContextBlock<JobRecord>,
    events: ContextBlock<EventRecord>,
    recommendations: Vec<Ranked<JobRecord>>,
}

impl Retrieved {
    fn combined_context(&self) -> String {
        format!("{}\n\n{}", self.jobs.text, self.events.text)
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub system_prompt: String,
    /// Most recent prior turns forwarded to the backend.
    pub history_window_turns: usize,
    pub llm_timeout: Duration,
    /// Applies to each retrieval call separately.
    pub retrieval_timeout: Duration,
}

pub struct Orchestrator {
    classifier: Arc<BiasClassifier>,
    empowerment: EmpowermentTable,
    jobs: Arc<CorpusRetriever<JobRecord>>,
    events: Arc<CorpusRetriever<EventRecord>>,
    backend: Arc<dyn ChatBackend>,
    sessions: Arc<dyn SessionStore>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        classifier: Arc<BiasClassifier>,
        empowerment: EmpowermentTable,
        jobs: Arc<CorpusRetriever<JobRecord>>,
        events: Arc<CorpusRetriever<EventRecord>>,
        backend: Arc<dyn ChatBackend>,
        sessions: Arc<dyn SessionStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            classifier,
            empowerment,
            jobs,
            events,
            backend,
            sessions,
            settings,
        }
    }

    /// Runs the pipeline for one query.
    ///
    /// Returns `None` for a blank query, which is ignored without touching the
    /// session. Every accepted query yields a bundle; failures degrade it.
    pub async fn process(&self, query: &Query) -> Option<ResponseBundle> {
        let text = query.text.trim();
        if text.is_empty() {
            debug!(session_id = %query.session_id, "Ignoring blank query");
            return None;
        }

        let started = Instant::now();
        info!(
            session_id = %query.session_id,
            query_len = text.len(),
            history_turns = query.history.len(),
            "Processing query"
        );

        // Degraded bundles keep the time up to the failure point.
        let (mut bundle, degraded) = match self.run(query, text).await {
            Ok(bundle) => (bundle, false),
            Err(e) => {
                error!(
                    session_id = %query.session_id,
                    stage = %e.stage(),
                    "Query processing failed, returning degraded response: {e}"
                );
                (ResponseBundle::degraded(started.elapsed().as_secs_f64()), true)
            }
        };

        self.sessions
            .append(
                &query.session_id,
                vec![
                    ChatMessage::user(query.text.clone()),
                    ChatMessage::assistant(bundle.response.clone()),
                ],
            )
            .await;

        if !degraded {
            bundle.processing_time = started.elapsed().as_secs_f64();
        }
        info!(
            session_id = %query.session_id,
            "Response produced in {:.2} seconds",
            bundle.processing_time
        );

        Some(bundle)
    }

    async fn run(&self, query: &Query, text: &str) -> Result<ResponseBundle, PipelineError> {
        let assessment = self.classifier.classify(text).await;
        info!(
            has_bias = assessment.has_bias,
            bias_type = ?assessment.bias_type,
            method = ?assessment.detection_method,
            "Bias check complete"
        );

        let branch = Branch::select(assessment);
        debug!(branch = branch.name(), "Branch selected");

        match branch {
            Branch::Empowerment(assessment) => self.empower(assessment).await,
            Branch::Generation => self.generate(query, text).await,
        }
    }

    async fn empower(&self, assessment: BiasAssessment) -> Result<ResponseBundle, PipelineError> {
        let statement = self.empowerment.respond(&assessment);
        let retrieved = self.retrieve(&assessment.reframed_text).await?;

        Ok(ResponseBundle {
            response: format!("{statement}\n\n{}", retrieved.combined_context()),
            has_bias: true,
            bias_info: Some(assessment),
            job_recommendations: retrieved.recommendations,
            processing_time: 0.0,
        })
    }

    async fn generate(&self, query: &Query, text: &str) -> Result<ResponseBundle, PipelineError> {
        let retrieved = self.retrieve(text).await?;
        let messages = self.build_messages(&query.history, text, &retrieved.combined_context());
        let params = GenerationParams {
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_OUTPUT_TOKENS),
            json_mode: false,
        };

        let response = deadline(
            Stage::Generation,
            self.settings.llm_timeout,
            self.backend.complete(&messages, &params),
        )
        .await??;
        info!(response_len = response.len(), "Generation succeeded");

        Ok(ResponseBundle {
            response,
            has_bias: false,
            bias_info: None,
            job_recommendations: retrieved.recommendations,
            processing_time: 0.0,
        })
    }

    /// Runs both corpus searches concurrently. The job search is shared by the
    /// context block (top 3) and the recommendation list (top 5).
    async fn retrieve(&self, search_text: &str) -> Result<Retrieved, PipelineError> {
        let limit = self.settings.retrieval_timeout;
        let (jobs, events) = tokio::join!(
            deadline(
                Stage::JobRetrieval,
                limit,
                self.jobs.retrieve(search_text, RECOMMENDATION_TOP_K.max(JOB_CONTEXT_TOP_K)),
            ),
            deadline(
                Stage::EventRetrieval,
                limit,
                self.events.retrieve(search_text, EVENT_CONTEXT_TOP_K),
            ),
        );
        let recommendations = jobs?;
        let events = events?;

        let today = Utc::now().date_naive();
        let jobs = job_context(recommendations.iter().take(JOB_CONTEXT_TOP_K).cloned().collect());
        let (events, framing) =
            event_context(events, || self.events.upcoming(today, UPCOMING_FALLBACK_LIMIT));
        let upcoming_fallback = framing == EventFraming::Upcoming;
        debug!(
            jobs = recommendations.len(),
            events = events.records.len(),
            upcoming_fallback,
            "Retrieval complete"
        );

        Ok(Retrieved {
            jobs,
            events,
            recommendations: recommendations.into_iter().take(RECOMMENDATION_TOP_K).collect(),
        })
    }

    fn build_messages(&self, history: &[Turn], text: &str, context: &str) -> Vec<ChatMessage> {
        let window = history.len().saturating_sub(self.settings.history_window_turns);
        let mut messages = Vec::with_capacity(2 + 2 * (history.len() - window));

        messages.push(ChatMessage::system(self.settings.system_prompt.clone()));
        for turn in &history[window..] {
            messages.push(ChatMessage::user(turn.user.clone()));
            messages.push(ChatMessage::assistant(turn.assistant.clone()));
        }
        messages.push(ChatMessage::user(annotate_query(text, context)));
        messages
    }
}

async fn deadline<F: Future>(
    stage: Stage,
    limit: Duration,
    future: F,
) -> Result<F::Output, PipelineError> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| PipelineError::Deadline { stage, limit })
}
