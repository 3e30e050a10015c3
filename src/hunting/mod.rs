// src/hunting/mod.rs
//! The job hunt: classification, deduplication, enrichment, ranking and orchestration

pub mod content_enricher;
pub mod dedup;
pub mod listing;
pub mod pipeline;
pub mod prompt;
pub mod ranker;
pub mod search_client;
pub mod staleness;

pub use content_enricher::{ContentEnricher, FetchError, JinaReader, PageReader};
pub use dedup::{DedupFilter, SeenStore};
pub use listing::{is_listing_page, listing_reason, ListingReason};
pub use pipeline::Pipeline;
pub use prompt::{build_prompt, RankingPrompt};
pub use ranker::{BackendError, GroqBackend, RankError, Ranker, RankingBackend};
pub use search_client::{JobSearcher, NoopSearcher, TavilySearcher};
pub use staleness::{is_stale, stale_reason, StaleReason};
