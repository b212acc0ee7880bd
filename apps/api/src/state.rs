use std::sync::Arc;

use crate::bias::classifier::BiasClassifier;
use crate::chat::memory::SessionStore;
use crate::chat::orchestrator::Orchestrator;
use crate::config::Config;
use crate::corpus::retriever::CorpusRetriever;
use crate::models::{EventRecord, JobRecord};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
    /// Same classifier the orchestrator uses; exposed for `/api/detect-bias`.
    pub classifier: Arc<BiasClassifier>,
    pub jobs: Arc<CorpusRetriever<JobRecord>>,
    pub events: Arc<CorpusRetriever<EventRecord>>,
    pub sessions: Arc<dyn SessionStore>,
}
