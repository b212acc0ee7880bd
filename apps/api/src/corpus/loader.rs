//! Reads job and event exports and normalizes them into uniform records.
//!
//! Exports are CSV files with a header row (`.csv`) or JSON arrays of row
//! objects (anything else). Missing optional columns are filled with display
//! defaults. If a file cannot be read or parsed, the synthetic
//! dataset from `sample` is substituted so the pipeline stays exercisable.

use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::sample::{sample_events, sample_jobs};
use super::CorpusError;
use crate::models::{EventRecord, JobRecord, RemoteOption};

const NO_DESCRIPTION: &str = "No description provided";
const NOT_SPECIFIED: &str = "Not specified";
const NOT_DISCLOSED: &str = "Not disclosed";

#[derive(Debug, Deserialize)]
struct RawJobRow {
    job_id: Option<Value>,
    #[serde(alias = "title")]
    job_title: Option<String>,
    #[serde(alias = "company")]
    company_name: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    #[serde(alias = "remote")]
    remote_option: Option<Value>,
    salary_range: Option<String>,
    experience_required: Option<String>,
    skills_required: Option<String>,
    #[serde(alias = "description")]
    job_description: Option<String>,
    posted_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEventRow {
    #[serde(alias = "session_id")]
    event_id: Option<Value>,
    #[serde(alias = "session_name")]
    name: Option<String>,
    #[serde(alias = "session_date")]
    date: Option<String>,
    #[serde(alias = "session_type", alias = "type")]
    event_type: Option<String>,
    location: Option<String>,
    speaker: Option<String>,
    description: Option<String>,
}

/// Loads the job corpus, substituting the sample dataset on failure.
pub fn load_jobs(path: &Path) -> Vec<JobRecord> {
    match read_jobs(path) {
        Ok(jobs) => {
            info!("Loaded {} job listings from {}", jobs.len(), path.display());
            jobs
        }
        Err(e) => {
            let jobs = sample_jobs();
            warn!("{e}; using sample data with {} job listings", jobs.len());
            jobs
        }
    }
}

/// Loads the event corpus, substituting the sample dataset on failure.
pub fn load_events(path: &Path) -> Vec<EventRecord> {
    match read_events(path) {
        Ok(events) => {
            info!("Loaded {} events from {}", events.len(), path.display());
            events
        }
        Err(e) => {
            let events = sample_events(Utc::now().date_naive());
            warn!("{e}; using sample data with {} events", events.len());
            events
        }
    }
}

pub fn read_jobs(path: &Path) -> Result<Vec<JobRecord>, CorpusError> {
    let rows: Vec<RawJobRow> = read_rows(path)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| normalize_job(i, row))
        .collect())
}

pub fn read_events(path: &Path) -> Result<Vec<EventRecord>, CorpusError> {
    let rows: Vec<RawEventRow> = read_rows(path)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| normalize_event(i, row))
        .collect())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CorpusError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_csv_rows(path)
    } else {
        read_json_rows(path)
    }
}

/// Columns are matched by header name; unknown columns are ignored and empty
/// cells read as absent.
fn read_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| CorpusError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn read_json_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CorpusError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Rows without a title or company cannot be presented and are skipped.
fn normalize_job(index: usize, row: RawJobRow) -> Option<JobRecord> {
    let (Some(job_title), Some(company_name)) = (non_blank(row.job_title), non_blank(row.company_name))
    else {
        warn!("Skipping job row {index}: missing title or company");
        return None;
    };

    Some(JobRecord {
        job_id: id_or_position(row.job_id, index),
        job_title,
        company_name,
        location: or_default(row.location, NOT_SPECIFIED),
        job_type: or_default(row.job_type, NOT_SPECIFIED),
        remote_option: match row.remote_option {
            Some(Value::Bool(flag)) => RemoteOption::from(flag),
            Some(Value::String(s)) => RemoteOption::parse(&s),
            _ => RemoteOption::NotSpecified,
        },
        salary_range: or_default(row.salary_range, NOT_DISCLOSED),
        experience_required: or_default(row.experience_required, NOT_SPECIFIED),
        skills_required: or_default(row.skills_required, NOT_SPECIFIED),
        job_description: or_default(row.job_description, NO_DESCRIPTION),
        posted_date: row.posted_date.as_deref().and_then(parse_date),
    })
}

/// Events need a name and a parseable date to be listed on the calendar.
fn normalize_event(index: usize, row: RawEventRow) -> Option<EventRecord> {
    let Some(name) = non_blank(row.name) else {
        warn!("Skipping event row {index}: missing name");
        return None;
    };
    let Some(date) = row.date.as_deref().and_then(parse_date) else {
        warn!("Skipping event row {index} ({name}): missing or invalid date");
        return None;
    };

    Some(EventRecord {
        event_id: id_or_position(row.event_id, index),
        name,
        date,
        event_type: or_default(row.event_type, NOT_SPECIFIED),
        location: or_default(row.location, NOT_SPECIFIED),
        speaker: or_default(row.speaker, "To be announced"),
        description: or_default(row.description, NO_DESCRIPTION),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

fn id_or_position(id: Option<Value>, index: usize) -> String {
    match id {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Accepts plain dates and the date prefix of timestamps ("2024-05-01T10:00:00").
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
