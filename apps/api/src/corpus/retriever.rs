//! Maps search-engine hits back onto records.
//!
//! Never fails: an unavailable engine yields an empty result set, which callers
//! treat as "no information" rather than as an error.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::index::SearchIndex;
use crate::models::{CorpusRecord, EventRecord, Ranked};

pub struct CorpusRetriever<T: CorpusRecord> {
    records: Vec<T>,
    index: Arc<dyn SearchIndex>,
}

impl<T: CorpusRecord> CorpusRetriever<T> {
    /// `index` must have been built from `records` in the same order.
    pub fn new(records: Vec<T>, index: Arc<dyn SearchIndex>) -> Self {
        Self { records, index }
    }

    /// Top-`top_k` records for `query`, highest relevance first.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<Ranked<T>> {
        if query.trim().is_empty() || top_k == 0 || self.records.is_empty() {
            return Vec::new();
        }

        let hits = match self.index.search(query, top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("{} search failed, returning no results: {e}", T::CORPUS);
                return Vec::new();
            }
        };

        let ranked: Vec<Ranked<T>> = hits
            .into_iter()
            .take(top_k)
            .filter_map(|hit| {
                self.records
                    .get(hit.position)
                    .map(|record| Ranked::scored(record.clone(), hit.score))
            })
            .collect();

        debug!("{} search returned {} records", T::CORPUS, ranked.len());
        ranked
    }
}

impl CorpusRetriever<EventRecord> {
    /// Calendar-ordered listing, independent of any query.
    ///
    /// Events on or after `today`, soonest first. When nothing is scheduled,
    /// the most recent past events are listed instead, newest first.
    pub fn upcoming(&self, today: NaiveDate, limit: usize) -> Vec<Ranked<EventRecord>> {
        let mut upcoming: Vec<&EventRecord> =
            self.records.iter().filter(|e| e.date >= today).collect();

        if upcoming.is_empty() {
            let mut recent: Vec<&EventRecord> = self.records.iter().collect();
            recent.sort_by(|a, b| b.date.cmp(&a.date));
            upcoming = recent;
        } else {
            upcoming.sort_by_key(|e| e.date);
        }

        upcoming
            .into_iter()
            .take(limit)
            .map(|e| Ranked::unscored(e.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::index::KeywordIndex;
    use crate::corpus::sample::{sample_events, sample_jobs};
    use crate::models::JobRecord;
    use crate::testing::FailingIndex;

    fn job_retriever(jobs: Vec<JobRecord>) -> CorpusRetriever<JobRecord> {
        let texts: Vec<String> = jobs.iter().map(CorpusRecord::descriptive_text).collect();
        CorpusRetriever::new(jobs, Arc::new(KeywordIndex::build(&texts)))
    }

    fn event(name: &str, date: NaiveDate) -> EventRecord {
        EventRecord {
            event_id: name.to_string(),
            name: name.to_string(),
            date,
            event_type: "Webinar".to_string(),
            location: "Online".to_string(),
            speaker: "Speaker".to_string(),
            description: "Description".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_retrieve_returns_scored_records_highest_first() {
        let retriever = job_retriever(sample_jobs());
        let results = retriever.retrieve("data scientist machine learning", 3).await;
        assert!(!results.is_empty());
        assert_eq!(results[0].record.job_title, "Data Scientist");
        let scores: Vec<f32> = results.iter().map(|r| r.relevance_score.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_retrieve_empty_corpus_is_empty() {
        let retriever = job_retriever(Vec::new());
        assert!(retriever
            .retrieve("Show me software engineering jobs in Bangalore", 3)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_blank_query_is_empty() {
        let retriever = job_retriever(sample_jobs());
        assert!(retriever.retrieve("   ", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_degrades_to_empty() {
        let retriever = CorpusRetriever::new(sample_jobs(), Arc::new(FailingIndex));
        assert!(retriever.retrieve("software engineer", 3).await.is_empty());
    }

    #[test]
    fn test_upcoming_lists_future_events_soonest_first() {
        let today = date(2025, 6, 1);
        let events = vec![
            event("later", date(2025, 7, 1)),
            event("past", date(2025, 5, 1)),
            event("soon", date(2025, 6, 2)),
            event("today", date(2025, 6, 1)),
        ];
        let retriever = CorpusRetriever::new(events, Arc::new(KeywordIndex::build(&[])));
        let names: Vec<String> = retriever
            .upcoming(today, 3)
            .into_iter()
            .map(|e| e.record.name)
            .collect();
        assert_eq!(names, vec!["today", "soon", "later"]);
    }

    #[test]
    fn test_upcoming_falls_back_to_most_recent_when_calendar_is_past() {
        let today = date(2030, 1, 1);
        let events = vec![event("older", date(2024, 1, 1)), event("newer", date(2025, 1, 1))];
        let retriever = CorpusRetriever::new(events, Arc::new(KeywordIndex::build(&[])));
        let listing = retriever.upcoming(today, 5);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].record.name, "newer");
        assert!(listing.iter().all(|e| e.relevance_score.is_none()));
    }

    #[test]
    fn test_upcoming_respects_limit() {
        let today = date(2025, 1, 1);
        let retriever =
            CorpusRetriever::new(sample_events(today), Arc::new(KeywordIndex::build(&[])));
        assert_eq!(retriever.upcoming(today, 2).len(), 2);
    }
}
