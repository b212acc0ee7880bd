//! Empowerment statements shown instead of a generated answer when a query is
//! judged biased. Selection is by bias type, falling back to the general list;
//! the response shape is gated on severity.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::models::{BiasAssessment, BiasType, Severity};

/// Statements needed to render a high-severity response.
const MIN_STATEMENTS: usize = 2;
const GENERAL_KEY: &str = "general";

const HIGH_SEVERITY_OPENING: &str =
    "I notice your question contains some assumptions about gender that aren't supported by research.";
const HIGH_SEVERITY_CLOSING: &str =
    "Would you like to learn more about women's achievements in this area?";
const GENTLE_CLOSING: &str = "Would you like more information about opportunities in this area?";

#[derive(Debug, Clone)]
pub struct EmpowermentTable {
    by_type: HashMap<BiasType, Vec<String>>,
    general: Vec<String>,
}

impl EmpowermentTable {
    pub fn defaults() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut by_type = HashMap::new();
        by_type.insert(
            BiasType::CapabilityBias,
            list(&[
                "Research shows that women excel in a wide range of fields including STEM, leadership, entrepreneurship, and more.",
                "Companies with gender-diverse teams are 25% more likely to achieve above-average profitability according to McKinsey research.",
                "Women-led startups have been shown to generate 10% more revenue over a five-year period compared to male-led startups.",
            ]),
        );
        by_type.insert(
            BiasType::StereotypeBias,
            list(&[
                "Research from Harvard Business Review shows that women leaders often score higher than men in most leadership skills evaluations.",
                "Studies show that diverse teams make better decisions 87% of the time compared to individual decision-makers.",
                "The ability to balance analytical and emotional intelligence is increasingly recognized as crucial for effective leadership.",
            ]),
        );
        by_type.insert(
            BiasType::RoleBias,
            list(&[
                "Women now constitute a majority of college-educated workforce in many countries.",
                "Organizations with women in leadership positions have been shown to navigate crisis situations more effectively.",
                "Flexible work arrangements benefit all employees and improve overall productivity and job satisfaction.",
            ]),
        );
        by_type.insert(
            BiasType::ComparativeBias,
            list(&[
                "The most successful organizations have diverse leadership teams that include people of all genders.",
                "Different perspectives and approaches to problem-solving enhance team performance and innovation.",
                "Research indicates that balanced gender representation leads to more innovative solutions and better financial performance.",
            ]),
        );
        by_type.insert(
            BiasType::RoleLimitationBias,
            list(&[
                "Women have succeeded in every career field, including traditionally male-dominated industries.",
                "Women hold CEO positions in major global companies across all sectors including technology, finance, and manufacturing.",
                "Studies show that gender-diverse teams are more innovative and better at solving complex problems.",
            ]),
        );

        Self {
            by_type,
            general: list(&[
                "Studies consistently show that diverse teams outperform homogeneous ones on complex tasks.",
                "Organizations with balanced gender representation report higher employee satisfaction and lower turnover.",
                "Mentorship and sponsorship programs have been shown to significantly advance women's careers in all fields.",
            ]),
        }
    }

    /// Loads a replacement table: a JSON object mapping bias-type labels (plus
    /// the mandatory `"general"` key) to lists of statements.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read empowerment resources from {}", path.display()))?;
        let mut entries: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid empowerment resources file {}", path.display()))?;

        for (key, statements) in &entries {
            if statements.len() < MIN_STATEMENTS {
                bail!(
                    "Empowerment list '{key}' in {} needs at least {MIN_STATEMENTS} statements",
                    path.display()
                );
            }
        }

        let Some(general) = entries.remove(GENERAL_KEY) else {
            bail!("Empowerment resources in {} lack a '{GENERAL_KEY}' list", path.display());
        };

        let by_type = entries
            .into_iter()
            .map(|(label, statements)| (BiasType::from_label(&label), statements))
            .collect();

        Ok(Self { by_type, general })
    }

    /// Statements for a bias type, or the general list when the type has none.
    pub fn statements_for(&self, bias_type: Option<BiasType>) -> &[String] {
        bias_type
            .and_then(|t| self.by_type.get(&t))
            .unwrap_or(&self.general)
    }

    /// Renders the response returned on the empowerment path.
    /// Missing severity is treated as medium.
    pub fn respond(&self, assessment: &BiasAssessment) -> String {
        let statements = self.statements_for(assessment.bias_type);
        let statement = |i: usize| statements.get(i).map(String::as_str).unwrap_or_default();

        match assessment.severity {
            Some(Severity::High) => format!(
                "{HIGH_SEVERITY_OPENING}\n\n{}\n\n{}\n\n{HIGH_SEVERITY_CLOSING}",
                statement(0),
                statement(1)
            ),
            _ => format!("{}\n\n{GENTLE_CLOSING}", statement(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::models::DetectionMethod;

    fn biased(bias_type: Option<BiasType>, severity: Option<Severity>) -> BiasAssessment {
        BiasAssessment {
            has_bias: true,
            bias_type,
            severity,
            explanation: None,
            reframed_text: "engineers jobs".to_string(),
            original_query: "Are women capable of being good engineers?".to_string(),
            detection_method: DetectionMethod::Lexical,
        }
    }

    #[test]
    fn test_high_severity_uses_two_statements() {
        let table = EmpowermentTable::defaults();
        let response = table.respond(&biased(Some(BiasType::CapabilityBias), Some(Severity::High)));

        assert!(response.starts_with(HIGH_SEVERITY_OPENING));
        assert!(response.contains("women excel in a wide range of fields"));
        assert!(response.contains("25% more likely"));
        assert!(response.ends_with(HIGH_SEVERITY_CLOSING));
    }

    #[test]
    fn test_lower_severity_is_gentle() {
        let table = EmpowermentTable::defaults();
        let response =
            table.respond(&biased(Some(BiasType::RoleLimitationBias), Some(Severity::Medium)));

        assert!(response.starts_with("Women have succeeded in every career field"));
        assert!(response.ends_with(GENTLE_CLOSING));
        assert!(!response.contains(HIGH_SEVERITY_OPENING));
    }

    #[test]
    fn test_missing_severity_is_gentle() {
        let table = EmpowermentTable::defaults();
        let response = table.respond(&biased(Some(BiasType::RoleBias), None));
        assert!(response.ends_with(GENTLE_CLOSING));
    }

    #[test]
    fn test_unlisted_type_falls_back_to_general() {
        let table = EmpowermentTable::defaults();
        for bias_type in [None, Some(BiasType::PotentialLeadershipBias), Some(BiasType::Other)] {
            let statements = table.statements_for(bias_type);
            assert!(statements[0].starts_with("Studies consistently show"));
        }
    }

    #[test]
    fn test_every_default_list_can_render_high_severity() {
        let table = EmpowermentTable::defaults();
        assert!(table.general.len() >= MIN_STATEMENTS);
        assert!(table.by_type.values().all(|s| s.len() >= MIN_STATEMENTS));
    }

    #[test]
    fn test_json_file_replaces_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"general": ["g1", "g2"], "role_bias": ["r1", "r2"]}"#,
        )
        .unwrap();
        let table = EmpowermentTable::from_json_file(file.path()).unwrap();

        assert_eq!(table.statements_for(Some(BiasType::RoleBias)), ["r1", "r2"]);
        assert_eq!(table.statements_for(Some(BiasType::CapabilityBias)), ["g1", "g2"]);
    }

    #[test]
    fn test_json_file_requires_general_and_two_statements() {
        let mut missing_general = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut missing_general, br#"{"role_bias": ["r1", "r2"]}"#).unwrap();
        assert!(EmpowermentTable::from_json_file(missing_general.path()).is_err());

        let mut short_list = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut short_list, br#"{"general": ["only one"]}"#).unwrap();
        assert!(EmpowermentTable::from_json_file(short_list.path()).is_err());
    }
}
