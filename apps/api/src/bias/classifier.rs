//! Bias classifier — semantic judgment via the LLM, lexical rules as fallback.
//!
//! The semantic path catches paraphrased bias; the lexical path keeps the gate
//! available when the backend is down or answers with something unparseable.
//! Classification never fails from the caller's point of view.

use std::sync::Arc;

use tracing::{debug, warn};

use super::models::{BiasAssessment, BiasType, ClassifierOutput, DetectionMethod, SemanticJudgment, Severity};
use super::prompts::{BIAS_PROMPT_TEMPLATE, CLASSIFIER_SYSTEM};
use super::rules::{neutral_rewrite, LexicalRules};
use crate::llm_client::{ChatBackend, ChatMessage, GenerationParams, LlmError};

pub struct BiasClassifier {
    backend: Arc<dyn ChatBackend>,
    rules: LexicalRules,
}

impl BiasClassifier {
    pub fn new(backend: Arc<dyn ChatBackend>, rules: LexicalRules) -> Self {
        Self { backend, rules }
    }

    pub async fn classify(&self, query: &str) -> BiasAssessment {
        match self.semantic(query).await {
            Ok(ClassifierOutput::Parsed(judgment)) => from_judgment(query, judgment),
            Ok(ClassifierOutput::Malformed(raw)) => {
                warn!(
                    "Semantic bias classifier returned malformed output, using lexical rules: {:?}",
                    raw.chars().take(120).collect::<String>()
                );
                self.lexical(query)
            }
            Err(e) => {
                warn!("Semantic bias classifier unavailable, using lexical rules: {e}");
                self.lexical(query)
            }
        }
    }

    /// Rule-table classification. First matching rule wins.
    pub fn lexical(&self, query: &str) -> BiasAssessment {
        match self.rules.first_match(query) {
            Some((bias_type, severity)) => BiasAssessment {
                has_bias: true,
                bias_type: Some(bias_type),
                severity: Some(severity),
                explanation: Some(format!(
                    "The query matches a known {} pattern.",
                    bias_type.label()
                )),
                reframed_text: neutral_rewrite(query),
                original_query: query.to_string(),
                detection_method: DetectionMethod::Lexical,
            },
            None => BiasAssessment::unbiased(query, DetectionMethod::Lexical),
        }
    }

    async fn semantic(&self, query: &str) -> Result<ClassifierOutput, LlmError> {
        let messages = [
            ChatMessage::system(CLASSIFIER_SYSTEM),
            ChatMessage::user(BIAS_PROMPT_TEMPLATE.replace("{query}", query)),
        ];
        let raw = self
            .backend
            .complete(&messages, &GenerationParams::json())
            .await?;
        debug!("Semantic bias classifier replied with {} chars", raw.len());
        Ok(ClassifierOutput::parse(&raw))
    }
}

/// Maps a parsed judgment onto an assessment, keeping the default-echo rule:
/// unbiased queries always reframe to themselves.
fn from_judgment(query: &str, judgment: SemanticJudgment) -> BiasAssessment {
    if !judgment.has_bias {
        return BiasAssessment::unbiased(query, DetectionMethod::Semantic);
    }

    let reframed_text = judgment
        .reframed_query
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| neutral_rewrite(query));

    BiasAssessment {
        has_bias: true,
        bias_type: judgment.bias_type.as_deref().map(BiasType::from_label),
        severity: judgment.severity.as_deref().and_then(Severity::from_label),
        explanation: judgment.explanation.filter(|e| !e.trim().is_empty()),
        reframed_text,
        original_query: query.to_string(),
        detection_method: DetectionMethod::Semantic,
    }
}
