use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of bias detected in a query. Drives empowerment statement selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasType {
    CapabilityBias,
    StereotypeBias,
    RoleBias,
    ComparativeBias,
    RoleLimitationBias,
    /// Low-severity catch on mentions of "women leaders"; lexical rules only.
    PotentialLeadershipBias,
    /// A label the semantic classifier produced that is not in the closed set.
    Other,
}

impl BiasType {
    pub fn label(self) -> &'static str {
        match self {
            BiasType::CapabilityBias => "capability_bias",
            BiasType::StereotypeBias => "stereotype_bias",
            BiasType::RoleBias => "role_bias",
            BiasType::ComparativeBias => "comparative_bias",
            BiasType::RoleLimitationBias => "role_limitation_bias",
            BiasType::PotentialLeadershipBias => "potential_leadership_bias",
            BiasType::Other => "other",
        }
    }

    /// Lenient parse of model output. Unknown labels map to `Other`.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace(|c: char| c == ' ' || c == '-', "_").as_str() {
            "capability_bias" => BiasType::CapabilityBias,
            "stereotype_bias" => BiasType::StereotypeBias,
            "role_bias" => BiasType::RoleBias,
            "comparative_bias" => BiasType::ComparativeBias,
            "role_limitation_bias" => BiasType::RoleLimitationBias,
            "potential_leadership_bias" => BiasType::PotentialLeadershipBias,
            _ => BiasType::Other,
        }
    }
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Semantic,
    Lexical,
}

/// Result of classifying one query.
///
/// `reframed_text` is always non-empty: it equals the original query when no
/// bias was found, so downstream code can use it without checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAssessment {
    pub has_bias: bool,
    pub bias_type: Option<BiasType>,
    pub severity: Option<Severity>,
    pub explanation: Option<String>,
    pub reframed_text: String,
    pub original_query: String,
    pub detection_method: DetectionMethod,
}

impl BiasAssessment {
    pub fn unbiased(query: &str, detection_method: DetectionMethod) -> Self {
        Self {
            has_bias: false,
            bias_type: None,
            severity: None,
            explanation: None,
            reframed_text: query.to_string(),
            original_query: query.to_string(),
            detection_method,
        }
    }
}

/// Structured judgment requested from the semantic classifier.
/// Labels stay as strings here and are mapped leniently afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticJudgment {
    pub has_bias: bool,
    #[serde(default)]
    pub bias_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default, alias = "reframed_text")]
    pub reframed_query: Option<String>,
}

/// What came back from the semantic classifier.
#[derive(Debug, Clone)]
pub enum ClassifierOutput {
    Parsed(SemanticJudgment),
    Malformed(String),
}

impl ClassifierOutput {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<SemanticJudgment>(crate::llm_client::strip_json_fences(raw)) {
            Ok(judgment) => ClassifierOutput::Parsed(judgment),
            Err(_) => ClassifierOutput::Malformed(raw.to_string()),
        }
    }
}
