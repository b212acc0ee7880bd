//! Context composer — turns retrieved records into the labeled text block that
//! grounds the response.
//!
//! Events have a usability fallback: when relevance search finds nothing, the
//! soonest upcoming events are listed under their own heading instead.

use crate::models::{EventRecord, JobRecord, Ranked};

pub const JOB_CONTEXT_TOP_K: usize = 3;
pub const EVENT_CONTEXT_TOP_K: usize = 2;
pub const UPCOMING_FALLBACK_LIMIT: usize = 3;

pub const JOBS_HEADING: &str = "Here are some relevant job opportunities:";
pub const EVENTS_HEADING: &str = "Here are some relevant events:";
pub const UPCOMING_HEADING: &str = "Here are some upcoming events that might interest you:";
pub const NO_JOBS: &str = "No relevant job information found.";
pub const NO_EVENTS: &str = "No relevant event information found.";

/// A formatted context block and the records it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextBlock<T> {
    pub text: String,
    pub records: Vec<Ranked<T>>,
}

/// Which framing an event block ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFraming {
    Relevant,
    Upcoming,
    Empty,
}

pub fn job_context(records: Vec<Ranked<JobRecord>>) -> ContextBlock<JobRecord> {
    if records.is_empty() {
        return ContextBlock {
            text: NO_JOBS.to_string(),
            records,
        };
    }

    let entries = records.iter().enumerate().map(|(i, ranked)| {
        let job = &ranked.record;
        format!(
            "Job {}: {} at {}\nLocation: {}\nJob Type: {}\nRemote Option: {}",
            i + 1,
            job.job_title,
            job.company_name,
            job.location,
            job.job_type,
            job.remote_option
        )
    });

    ContextBlock {
        text: with_heading(JOBS_HEADING, entries),
        records,
    }
}

/// Formats relevant events, or the calendar fallback when there are none.
/// `upcoming` is only invoked on the fallback path.
pub fn event_context(
    relevant: Vec<Ranked<EventRecord>>,
    upcoming: impl FnOnce() -> Vec<Ranked<EventRecord>>,
) -> (ContextBlock<EventRecord>, EventFraming) {
    if !relevant.is_empty() {
        let entries = relevant.iter().enumerate().map(|(i, ranked)| {
            let event = &ranked.record;
            format!(
                "Event {}: {}\nDate: {}\nType: {}\nLocation: {}\nSpeaker: {}",
                i + 1,
                event.name,
                event.date,
                event.event_type,
                event.location,
                event.speaker
            )
        });
        let block = ContextBlock {
            text: with_heading(EVENTS_HEADING, entries),
            records: relevant,
        };
        return (block, EventFraming::Relevant);
    }

    let listing = upcoming();
    if listing.is_empty() {
        let block = ContextBlock {
            text: NO_EVENTS.to_string(),
            records: listing,
        };
        return (block, EventFraming::Empty);
    }

    let entries = listing.iter().enumerate().map(|(i, ranked)| {
        let event = &ranked.record;
        format!(
            "Event {}: {}\nDate: {}\nType: {}\nLocation: {}",
            i + 1,
            event.name,
            event.date,
            event.event_type,
            event.location
        )
    });
    let block = ContextBlock {
        text: with_heading(UPCOMING_HEADING, entries),
        records: listing,
    };
    (block, EventFraming::Upcoming)
}

fn with_heading(heading: &str, entries: impl Iterator<Item = String>) -> String {
    let mut text = heading.to_string();
    for entry in entries {
        text.push_str("\n\n");
        text.push_str(&entry);
    }
    text
}
