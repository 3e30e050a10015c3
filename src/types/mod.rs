pub mod job;
pub mod response;

pub use job::{Candidate, InputError, JobType, SearchRequest, SeenRecord, TimeFilter};
pub use response::{CandidateSummary, HuntResult, HuntSummary, NO_FRESH_CANDIDATES_REPORT};
