use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CorpusRecord;

/// A normalized community event (session, webinar, meetup, mentorship slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    pub name: String,
    pub date: NaiveDate,
    pub event_type: String,
    pub location: String,
    pub speaker: String,
    pub description: String,
}

impl CorpusRecord for EventRecord {
    const CORPUS: &'static str = "events";

    fn descriptive_text(&self) -> String {
        format!(
            "Event: {}\nDate: {}\nType: {}\nLocation: {}\nSpeaker: {}\nDescription: {}",
            self.name, self.date, self.event_type, self.location, self.speaker, self.description,
        )
    }
}
