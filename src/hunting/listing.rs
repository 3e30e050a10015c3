// src/hunting/listing.rs
//! Tells direct job postings apart from search, listing and aggregator pages.
//!
//! Rules are checked in a fixed order and the first match decides. Evidence of a
//! real posting (the allow-list) beats every listing heuristic, and URLs nothing
//! matches are kept as postings.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Path fragments that only appear on single-posting pages
const POSTING_PATH_FRAGMENTS: &[&str] = &[
    "/jobs/view/",
    "/viewjob",
    "/job-detail",
    "/jobdetail",
    "/position/",
    "/opening/",
    "/job/",
    "/jobs/detail/",
];

/// Query keys that pin a URL to exactly one posting
const POSTING_QUERY_KEYS: &[&str] = &["jk", "gh_jid", "currentjobid", "jobid"];

/// Hosted ATS boards whose detail pages live one level below the company slug
const ATS_DETAIL_HOSTS: &[&str] = &[
    "jobs.lever.co",
    "jobs.ashbyhq.com",
    "jobs.smartrecruiters.com",
    "apply.workable.com",
    "jobs.jobvite.com",
    "careers.icims.com",
];

static GREENHOUSE_JOB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/jobs/\d+").expect("valid greenhouse pattern"));

static NUMERIC_JOB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/jobs?/[^/]*\d{5,}").expect("valid job id pattern"));

const LISTING_PATH_FRAGMENTS: &[&str] = &[
    "/jobs/all",
    "/jobs/search",
    "/jobs/browse",
    "/opportunities",
    "/search",
    "/browse/",
    "/category/",
    "/categories/",
    "/job-search",
    "/find-jobs",
    "/jobs-in-",
    "/job-listings",
];

const SEARCH_QUERY_KEYS: &[&str] = &[
    "q",
    "query",
    "search",
    "keywords",
    "filter",
    "location",
    "category",
];

const JOB_ID_QUERY_KEYS: &[&str] = &[
    "jk",
    "vjk",
    "job_id",
    "jobid",
    "id",
    "gh_jid",
    "currentjobid",
    "posting_id",
];

/// Which listing rule fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingReason {
    BareIndex(String),
    ListingPath(&'static str),
    SearchQuery(String),
    SingleSegment(String),
}

impl fmt::Display for ListingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BareIndex(path) => write!(f, "bare index page '{}'", path),
            Self::ListingPath(fragment) => write!(f, "listing path '{}'", fragment),
            Self::SearchQuery(key) => write!(f, "search query parameter '{}'", key),
            Self::SingleSegment(segment) => write!(f, "top-level section '/{}'", segment),
        }
    }
}

/// Decide whether a URL points at a listing page rather than a single posting
pub fn is_listing_page(url: &str) -> bool {
    listing_reason(url).is_some()
}

/// Same as [`is_listing_page`] but reports the rule that fired
pub fn listing_reason(url: &str) -> Option<ListingReason> {
    let parsed = parse_lenient(url)?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let path = parsed.path().to_lowercase();
    let query_keys: Vec<String> = parsed
        .query_pairs()
        .map(|(key, _)| key.to_lowercase())
        .collect();

    if is_direct_posting(&host, &path, &query_keys) {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.ends_with("/jobs") || trimmed.ends_with("/careers") {
        return Some(ListingReason::BareIndex(trimmed.to_string()));
    }

    if let Some(fragment) = LISTING_PATH_FRAGMENTS.iter().find(|f| path.contains(*f)) {
        return Some(ListingReason::ListingPath(fragment));
    }

    let search_key = query_keys
        .iter()
        .find(|key| SEARCH_QUERY_KEYS.contains(&key.as_str()));
    let has_job_id = query_keys
        .iter()
        .any(|key| JOB_ID_QUERY_KEYS.contains(&key.as_str()));
    if let (Some(key), false) = (search_key, has_job_id) {
        return Some(ListingReason::SearchQuery(key.clone()));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if let [segment] = segments.as_slice() {
        if segment.contains("jobs") || segment.contains("careers") {
            return Some(ListingReason::SingleSegment(segment.to_string()));
        }
    }

    None
}

fn is_direct_posting(host: &str, path: &str, query_keys: &[String]) -> bool {
    if POSTING_PATH_FRAGMENTS.iter().any(|f| path.contains(f)) {
        return true;
    }

    if query_keys
        .iter()
        .any(|key| POSTING_QUERY_KEYS.contains(&key.as_str()))
    {
        return true;
    }

    if host.ends_with("greenhouse.io") && GREENHOUSE_JOB.is_match(path) {
        return true;
    }

    if ATS_DETAIL_HOSTS.contains(&host) && path.split('/').filter(|s| !s.is_empty()).count() >= 2 {
        return true;
    }

    NUMERIC_JOB_ID.is_match(path)
}

fn parse_lenient(url: &str) -> Option<Url> {
    let url = url.trim();
    Url::parse(url)
        .or_else(|_| Url::parse(&format!("https://{}", url)))
        .ok()
}
