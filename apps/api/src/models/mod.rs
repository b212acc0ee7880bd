pub mod event;
pub mod job;

use serde::{Deserialize, Serialize};

pub use event::EventRecord;
pub use job::{JobRecord, RemoteOption};

/// A record that can be stored in a searchable corpus.
pub trait CorpusRecord: Clone + Send + Sync + 'static {
    /// Label used in logs ("jobs", "events").
    const CORPUS: &'static str;

    /// Flattens the record into the single descriptive text fed to the search index.
    fn descriptive_text(&self) -> String;
}

/// A corpus record as returned to callers.
///
/// `relevance_score` is only present when the record came out of a similarity
/// search; calendar-ordered listings leave it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f32>,
}

impl<T> Ranked<T> {
    pub fn scored(record: T, score: f32) -> Self {
        Self {
            record,
            relevance_score: Some(score),
        }
    }

    pub fn unscored(record: T) -> Self {
        Self {
            record,
            relevance_score: None,
        }
    }
}
