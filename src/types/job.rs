// src/types/job.rs
//! Job posting records shared by the hunting pipeline, the store and the boundaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejections raised before any pipeline work begins
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown time filter: {0}. Use past_day, past_week or past_month")]
    UnknownTimeFilter(String),

    #[error("Unknown job type: {0}. Use any, internship, fulltime, parttime, contract or freelance")]
    UnknownJobType(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    PastDay,
    #[default]
    PastWeek,
    PastMonth,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 3] = [Self::PastDay, Self::PastWeek, Self::PastMonth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PastDay => "past_day",
            Self::PastWeek => "past_week",
            Self::PastMonth => "past_month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PastDay => "Past 24 Hours",
            Self::PastWeek => "Past Week",
            Self::PastMonth => "Past Month",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "past_day" | "day" | "d" => Ok(Self::PastDay),
            "past_week" | "week" | "w" => Ok(Self::PastWeek),
            "past_month" | "month" | "m" => Ok(Self::PastMonth),
            other => Err(InputError::UnknownTimeFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[default]
    Any,
    Internship,
    FullTime,
    PartTime,
    Contract,
    Freelance,
}

impl JobType {
    pub const ALL: [JobType; 6] = [
        Self::Any,
        Self::Internship,
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Freelance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Internship => "internship",
            Self::FullTime => "fulltime",
            Self::PartTime => "parttime",
            Self::Contract => "contract",
            Self::Freelance => "freelance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Any => "Any Type",
            Self::Internship => "Internship",
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Contract => "Contract",
            Self::Freelance => "Freelance",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "any" | "" => Ok(Self::Any),
            "internship" | "intern" => Ok(Self::Internship),
            "fulltime" => Ok(Self::FullTime),
            "parttime" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "freelance" => Ok(Self::Freelance),
            _ => Err(InputError::UnknownJobType(s.to_string())),
        }
    }
}

/// One search invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    job_title: String,
    location: String,
    time_filter: TimeFilter,
    job_type: JobType,
}

impl SearchRequest {
    pub fn new(
        job_title: &str,
        location: &str,
        time_filter: TimeFilter,
        job_type: JobType,
    ) -> Result<Self, InputError> {
        let job_title = job_title.trim();
        let location = location.trim();

        if job_title.is_empty() {
            return Err(InputError::MissingField("job_title"));
        }
        if location.is_empty() {
            return Err(InputError::MissingField("location"));
        }

        Ok(Self {
            job_title: job_title.to_string(),
            location: location.to_string(),
            time_filter,
            job_type,
        })
    }

    /// Build from loosely typed boundary input; absent filters take their defaults
    pub fn parse(
        job_title: Option<&str>,
        location: Option<&str>,
        time_filter: Option<&str>,
        job_type: Option<&str>,
    ) -> Result<Self, InputError> {
        let time_filter = match time_filter {
            Some(raw) => raw.parse()?,
            None => TimeFilter::default(),
        };
        let job_type = match job_type {
            Some(raw) => raw.parse()?,
            None => JobType::default(),
        };

        Self::new(
            job_title.unwrap_or_default(),
            location.unwrap_or_default(),
            time_filter,
            job_type,
        )
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.time_filter
    }

    pub fn job_type(&self) -> JobType {
        self.job_type
    }
}

/// A single job-posting search result under consideration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub full_content: Option<String>,
    is_new: bool,
    pub job_title: String,
    pub location: String,
}

impl Candidate {
    pub fn new(url: &str, title: &str, snippet: &str, request: &SearchRequest) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            full_content: None,
            is_new: false,
            job_title: request.job_title().to_string(),
            location: request.location().to_string(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Dedup verdict; only the dedup filter decides this
    pub(crate) fn with_seen_status(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    /// Text handed to the ranker: full page text when enriched, snippet otherwise
    pub fn content(&self) -> &str {
        self.full_content.as_deref().unwrap_or(&self.snippet)
    }

    pub(crate) fn with_snippet_as_content(mut self) -> Self {
        self.full_content = Some(self.snippet.clone());
        self
    }
}

/// Persistent marker for a URL already surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SeenRecord {
    pub url: String,
    pub title: String,
    pub first_seen_at: DateTime<Utc>,
    pub query_job_title: String,
    pub query_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_requires_title_and_location() {
        assert_eq!(
            SearchRequest::new("  ", "Remote", TimeFilter::PastDay, JobType::Any),
            Err(InputError::MissingField("job_title"))
        );
        assert_eq!(
            SearchRequest::new("Data Analyst", "", TimeFilter::PastDay, JobType::Any),
            Err(InputError::MissingField("location"))
        );
    }

    #[test]
    fn test_parse_applies_defaults() {
        let request = SearchRequest::parse(Some("Rust Developer"), Some("Berlin"), None, None)
            .expect("valid request");
        assert_eq!(request.time_filter(), TimeFilter::PastWeek);
        assert_eq!(request.job_type(), JobType::Any);
        assert_eq!(request.job_title(), "Rust Developer");
    }

    #[test]
    fn test_parse_rejects_unknown_filters() {
        assert!(matches!(
            SearchRequest::parse(Some("a"), Some("b"), Some("past_year"), None),
            Err(InputError::UnknownTimeFilter(_))
        ));
        assert!(matches!(
            SearchRequest::parse(Some("a"), Some("b"), None, Some("gig")),
            Err(InputError::UnknownJobType(_))
        ));
    }

    #[test]
    fn test_job_type_parsing_is_lenient_on_separators() {
        assert_eq!("full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!("Part Time".parse::<JobType>(), Ok(JobType::PartTime));
        assert_eq!("fulltime".parse::<JobType>(), Ok(JobType::FullTime));
    }

    #[test]
    fn test_serde_names_match_wire_values() {
        assert_eq!(
            serde_json::to_string(&TimeFilter::PastMonth).unwrap(),
            "\"past_month\""
        );
        assert_eq!(
            serde_json::to_string(&JobType::FullTime).unwrap(),
            "\"fulltime\""
        );
    }

    #[test]
    fn test_candidate_content_falls_back_to_snippet() {
        let request =
            SearchRequest::new("Data Analyst", "Remote", TimeFilter::PastWeek, JobType::Any)
                .unwrap();
        let mut candidate = Candidate::new("https://x.io/job/1", "Analyst", "short", &request);
        assert_eq!(candidate.content(), "short");

        candidate.full_content = Some("long page".to_string());
        assert_eq!(candidate.content(), "long page");
    }

    #[test]
    fn test_candidate_is_not_new_until_partitioned() {
        let request =
            SearchRequest::new("Data Analyst", "Remote", TimeFilter::PastWeek, JobType::Any)
                .unwrap();
        let candidate = Candidate::new("https://x.io/job/1", "Analyst", "short", &request);
        assert!(!candidate.is_new());
        assert!(candidate.with_seen_status(true).is_new());
    }
}
