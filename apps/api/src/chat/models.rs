use serde::{Deserialize, Serialize};

use crate::bias::models::BiasAssessment;
use crate::llm_client::{ChatMessage, Role};
use crate::models::{JobRecord, Ranked};

use super::prompts::DEGRADED_RESPONSE;

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    /// Pairs a role-tagged transcript into turns.
    ///
    /// A user message is paired with the assistant message that immediately
    /// follows it; anything else (system entries, unanswered user messages,
    /// assistant messages without a preceding user message) is skipped.
    pub fn pair(messages: &[ChatMessage]) -> Vec<Turn> {
        let mut turns = Vec::new();
        let mut pending_user: Option<&str> = None;

        for message in messages {
            match message.role {
                Role::User => pending_user = Some(message.content.as_str()),
                Role::Assistant => {
                    if let Some(user) = pending_user.take() {
                        turns.push(Turn {
                            user: user.to_string(),
                            assistant: message.content.clone(),
                        });
                    }
                }
                Role::System => {}
            }
        }

        turns
    }
}

/// An accepted query, immutable for the duration of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub text: String,
    pub session_id: String,
    pub history: Vec<Turn>,
}

/// What one pipeline run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseBundle {
    pub response: String,
    pub has_bias: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_info: Option<BiasAssessment>,
    pub job_recommendations: Vec<Ranked<JobRecord>>,
    /// Seconds from query acceptance to the bundle being ready.
    pub processing_time: f64,
}

impl ResponseBundle {
    pub fn degraded(processing_time: f64) -> Self {
        Self {
            response: DEGRADED_RESPONSE.to_string(),
            has_bias: false,
            bias_info: None,
            job_recommendations: Vec::new(),
            processing_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_builds_turns_in_order() {
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("jobs?"),
            ChatMessage::assistant("here are some"),
        ];
        let turns = Turn::pair(&messages);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].user, "jobs?");
        assert_eq!(turns[1].assistant, "here are some");
    }

    #[test]
    fn test_pair_skips_unanswered_and_orphaned_messages() {
        let messages = vec![
            ChatMessage::assistant("welcome"),
            ChatMessage::user("first"),
            ChatMessage::user("second"),
            ChatMessage::assistant("answer"),
            ChatMessage::user("dangling"),
        ];
        let turns = Turn::pair(&messages);
        assert_eq!(
            turns,
            vec![Turn {
                user: "second".to_string(),
                assistant: "answer".to_string(),
            }]
        );
    }

    #[test]
    fn test_degraded_bundle_shape() {
        let bundle = ResponseBundle::degraded(0.25);
        assert_eq!(bundle.response, DEGRADED_RESPONSE);
        assert!(!bundle.has_bias);
        assert!(bundle.job_recommendations.is_empty());

        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json.get("bias_info").is_none());
    }
}
