//! Per-session, append-only conversation transcripts.
//!
//! Nothing is ever removed; what gets forwarded to the generation backend is
//! windowed by the orchestrator, not here.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::llm_client::ChatMessage;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The session's transcript, creating an empty one on first use.
    async fn get_or_create(&self, session_id: &str) -> Vec<ChatMessage>;

    /// Appends to the session's transcript, creating it if needed.
    async fn append(&self, session_id: &str, messages: Vec<ChatMessage>);

    /// The session's transcript, or `None` if the session was never seen.
    async fn read(&self, session_id: &str) -> Option<Vec<ChatMessage>>;
}

/// Process-lifetime store. Sessions do not survive a restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Vec<ChatMessage> {
        if let Some(messages) = self.sessions.read().await.get(session_id) {
            return messages.clone();
        }
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    async fn append(&self, session_id: &str, messages: Vec<ChatMessage>) {
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .extend(messages);
    }

    async fn read(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        self.sessions.read().await.get(session_id).cloned()
    }
}
