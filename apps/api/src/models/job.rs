use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CorpusRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteOption {
    Yes,
    No,
    Hybrid,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl RemoteOption {
    /// Accepts the spellings found in job exports ("Yes", "remote", "true", "N", ...).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "remote" => RemoteOption::Yes,
            "hybrid" => RemoteOption::Hybrid,
            "no" | "n" | "false" | "onsite" | "on-site" => RemoteOption::No,
            _ => RemoteOption::NotSpecified,
        }
    }
}

impl From<bool> for RemoteOption {
    fn from(flag: bool) -> Self {
        if flag {
            RemoteOption::Yes
        } else {
            RemoteOption::No
        }
    }
}

impl fmt::Display for RemoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOption::Yes => f.write_str("Yes"),
            RemoteOption::No => f.write_str("No"),
            RemoteOption::Hybrid => f.write_str("Hybrid"),
            RemoteOption::NotSpecified => f.write_str("Not specified"),
        }
    }
}

/// A normalized job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub remote_option: RemoteOption,
    pub salary_range: String,
    pub experience_required: String,
    pub skills_required: String,
    pub job_description: String,
    pub posted_date: Option<NaiveDate>,
}

impl CorpusRecord for JobRecord {
    const CORPUS: &'static str = "jobs";

    fn descriptive_text(&self) -> String {
        format!(
            "Job Title: {}\nCompany: {}\nLocation: {}\nExperience Required: {}\n\
             Skills Required: {}\nJob Type: {}\nRemote Option: {}\nSalary Range: {}\n\
             Description: {}",
            self.job_title,
            self.company_name,
            self.location,
            self.experience_required,
            self.skills_required,
            self.job_type,
            self.remote_option,
            self.salary_range,
            self.job_description,
        )
    }
}
