//! Lexical bias rules — the availability fallback when the semantic classifier
//! is unreachable or returns something unparseable.
//!
//! Rules are matched against the lower-cased query in order; first match wins.
//! The compiled-in table can be replaced by a JSON file at startup.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::models::{BiasType, Severity};

/// One pattern → (bias_type, severity) rule as stored in a rules file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasRule {
    pub pattern: String,
    pub bias_type: BiasType,
    pub severity: Severity,
}

fn default_rules() -> Vec<BiasRule> {
    let rule = |pattern: &str, bias_type, severity| BiasRule {
        pattern: pattern.to_string(),
        bias_type,
        severity,
    };

    vec![
        rule(
            r"wom[ae]n (can't|cannot|can not|aren't able to|are not able to|are not good at|not good at|are incapable of)|\b(are|can|could) wom[ae]n (really |even |ever )?(be )?(capable|able|good enough|smart enough|competent)",
            BiasType::CapabilityBias,
            Severity::High,
        ),
        rule(
            r"(female|women).*(emotional|irrational|sensitive)",
            BiasType::StereotypeBias,
            Severity::High,
        ),
        rule(
            r"wom[ae]n should (stay|be in|focus on).*home",
            BiasType::RoleBias,
            Severity::High,
        ),
        rule(
            r"\b(male|men)\b.*\b(better|stronger|smarter|more capable|more suited)\b",
            BiasType::ComparativeBias,
            Severity::High,
        ),
        rule(
            r"(suitable|appropriate|best) (jobs|roles|positions|careers) for women",
            BiasType::RoleLimitationBias,
            Severity::Medium,
        ),
        rule(
            r"wom[ae]n leaders",
            BiasType::PotentialLeadershipBias,
            Severity::Low,
        ),
    ]
}

struct CompiledRule {
    regex: Regex,
    bias_type: BiasType,
    severity: Severity,
}

/// Ordered, compiled rule table.
pub struct LexicalRules {
    rules: Vec<CompiledRule>,
}

impl LexicalRules {
    pub fn new(rules: Vec<BiasRule>) -> Result<Self, regex::Error> {
        let rules = rules
            .into_iter()
            .map(|r| {
                Ok(CompiledRule {
                    regex: Regex::new(&r.pattern)?,
                    bias_type: r.bias_type,
                    severity: r.severity,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// The compiled-in rule table.
    pub fn defaults() -> Self {
        Self::new(default_rules()).expect("built-in bias patterns must compile")
    }

    /// Loads a replacement rule table: a JSON array of `BiasRule`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bias rules from {}", path.display()))?;
        let rules: Vec<BiasRule> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid bias rules file {}", path.display()))?;
        Self::new(rules).with_context(|| format!("Invalid pattern in {}", path.display()))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// First rule matching the query, in table order.
    pub fn first_match(&self, query: &str) -> Option<(BiasType, Severity)> {
        let normalized = query.to_lowercase().replace('\u{2019}', "'");
        self.rules
            .iter()
            .find(|r| r.regex.is_match(&normalized))
            .map(|r| (r.bias_type, r.severity))
    }
}

const GENDERED_TERMS: &[&str] = &[
    "women", "woman", "womens", "female", "females", "girl", "girls", "lady", "ladies", "men",
    "man", "mens", "male", "males", "boy", "boys", "guys", "she", "her", "hers", "he", "him",
    "his",
];

/// Words carrying the biased framing (and question filler around it).
/// Nouns naming what the user is looking for are never in this list.
const FRAMING_TERMS: &[&str] = &[
    "a", "an", "the", "are", "is", "be", "being", "been", "can", "could", "cant", "cannot",
    "not", "aren", "isn", "t", "able", "capable", "incapable", "competent", "good", "bad",
    "enough", "smart", "at", "of", "to", "for", "as", "should", "stay", "home", "focus",
    "on", "suitable", "appropriate", "best", "better", "worse", "stronger", "smarter", "more",
    "less", "suited", "than", "so", "too", "really", "even", "ever", "why", "what", "which",
    "how", "do", "does", "emotional", "irrational", "sensitive", "and", "or", "with", "they",
    "them",
];

/// Words that already name the kind of result wanted.
const NEED_TERMS: &[&str] = &[
    "job", "jobs", "role", "roles", "position", "positions", "career", "careers", "opening",
    "openings", "opportunity", "opportunities", "work", "vacancy", "vacancies",
];

/// Bias-neutral rewrite used for retrieval when the lexical path fires.
///
/// Gendered and framing words are dropped and the rest is kept in order. A
/// rewrite that no longer names what is being looked for gets "jobs" appended,
/// so "Are women capable of being good engineers?" becomes "engineers jobs".
pub fn neutral_rewrite(query: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    for word in query
        .to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if GENDERED_TERMS.contains(&word)
            || FRAMING_TERMS.contains(&word)
            || kept.iter().any(|t| t == word)
        {
            continue;
        }
        kept.push(word.to_string());
    }

    if !kept.iter().any(|w| NEED_TERMS.contains(&w.as_str())) {
        kept.push("jobs".to_string());
    }
    kept.join(" ")
}
