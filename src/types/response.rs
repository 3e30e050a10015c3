use serde::{Deserialize, Serialize};

use super::job::Candidate;

/// Report returned when nothing survives the staleness and listing filters
pub const NO_FRESH_CANDIDATES_REPORT: &str =
    "No fresh jobs found. Try the 'Past Month' filter or different search terms.";

// ===== Pipeline Result Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntResult {
    pub total_count: usize,
    pub new_count: usize,
    pub seen_count: usize,
    pub candidates: Vec<Candidate>,
    pub report: String,
}

impl HuntResult {
    pub fn no_fresh_candidates() -> Self {
        Self {
            total_count: 0,
            new_count: 0,
            seen_count: 0,
            candidates: Vec::new(),
            report: NO_FRESH_CANDIDATES_REPORT.to_string(),
        }
    }

    pub fn summary(&self) -> HuntSummary {
        HuntSummary {
            total_count: self.total_count,
            new_count: self.new_count,
            seen_count: self.seen_count,
            candidates: self.candidates.iter().map(CandidateSummary::from).collect(),
            report: self.report.clone(),
        }
    }
}

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub is_new: bool,
}

impl From<&Candidate> for CandidateSummary {
    fn from(candidate: &Candidate) -> Self {
        Self {
            title: candidate.title.clone(),
            url: candidate.url.clone(),
            snippet: candidate.snippet.clone(),
            is_new: candidate.is_new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntSummary {
    pub total_count: usize,
    pub new_count: usize,
    pub seen_count: usize,
    pub candidates: Vec<CandidateSummary>,
    pub report: String,
}
