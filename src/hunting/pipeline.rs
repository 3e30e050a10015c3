// src/hunting/pipeline.rs
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::content_enricher::ContentEnricher;
use super::dedup::{DedupFilter, SeenStore};
use super::listing::listing_reason;
use super::ranker::Ranker;
use super::search_client::JobSearcher;
use super::staleness::stale_reason;
use crate::types::{Candidate, HuntResult, SearchRequest};
use crate::utils::short_title;

/// search → filter → dedup → enrich → rank → remember
pub struct Pipeline {
    searcher: Arc<dyn JobSearcher>,
    store: Arc<dyn SeenStore>,
    dedup: DedupFilter,
    enricher: ContentEnricher,
    ranker: Ranker,
    max_candidates: usize,
    max_enrich: usize,
}

impl Pipeline {
    pub fn new(
        searcher: Arc<dyn JobSearcher>,
        store: Arc<dyn SeenStore>,
        enricher: ContentEnricher,
        ranker: Ranker,
        max_candidates: usize,
        max_enrich: usize,
    ) -> Self {
        Self {
            searcher,
            dedup: DedupFilter::new(Arc::clone(&store)),
            store,
            enricher,
            ranker,
            max_candidates,
            max_enrich,
        }
    }

    pub fn store(&self) -> &Arc<dyn SeenStore> {
        &self.store
    }

    /// Never fails: backend faults become empty results or report text
    pub async fn run(&self, request: &SearchRequest, resume_text: Option<&str>) -> HuntResult {
        let run_id = Uuid::new_v4();
        let span = info_span!("hunt", run_id = %run_id);
        self.run_inner(request, resume_text).instrument(span).await
    }

    async fn run_inner(&self, request: &SearchRequest, resume_text: Option<&str>) -> HuntResult {
        info!(
            job_title = %request.job_title(),
            location = %request.location(),
            time_filter = %request.time_filter(),
            job_type = %request.job_type(),
            "Starting job hunt"
        );

        let raw = match self.searcher.search(request).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Search backend failed, continuing with no results");
                Vec::new()
            }
        };

        let filtered = self.filter(raw, request);
        if filtered.is_empty() {
            info!("No fresh candidates survived filtering");
            return HuntResult::no_fresh_candidates();
        }

        let (new_jobs, seen_jobs) = self.dedup.partition(filtered).await;
        let new_count = new_jobs.len();
        let seen_count = seen_jobs.len();
        info!(new = new_count, seen = seen_count, "Deduplicated candidates");

        let combined: Vec<Candidate> = new_jobs.into_iter().chain(seen_jobs).collect();
        let candidates = if new_count > 0 {
            self.enricher.enrich(combined, self.max_enrich).await
        } else {
            combined
                .into_iter()
                .map(Candidate::with_snippet_as_content)
                .collect()
        };

        let report = match self.ranker.rank(&candidates, request, resume_text).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Ranking did not produce a report");
                e.to_string()
            }
        };

        if new_count > 0 {
            let fresh: Vec<Candidate> = candidates
                .iter()
                .filter(|c| c.is_new())
                .cloned()
                .collect();
            match self
                .store
                .mark_seen(&fresh, request.job_title(), request.location())
                .await
            {
                Ok(inserted) => info!(inserted, "Remembered new postings"),
                Err(e) => error!(error = %e, "Failed to remember new postings"),
            }
        }

        HuntResult {
            total_count: candidates.len(),
            new_count,
            seen_count,
            candidates,
            report,
        }
    }

    /// Drops stale postings and listing pages, collapses repeated URLs, caps the set
    fn filter(&self, raw: Vec<Candidate>, request: &SearchRequest) -> Vec<Candidate> {
        let raw_count = raw.len();
        let mut urls = HashSet::new();
        let mut kept = Vec::new();

        for candidate in raw {
            if kept.len() >= self.max_candidates {
                break;
            }
            if let Some(reason) = stale_reason(&candidate, request.time_filter()) {
                debug!(title = %short_title(&candidate.title), reason = %reason, "Skipping stale posting");
                continue;
            }
            if let Some(reason) = listing_reason(&candidate.url) {
                debug!(url = %candidate.url, reason = %reason, "Skipping listing page");
                continue;
            }
            if !urls.insert(candidate.url.clone()) {
                debug!(url = %candidate.url, "Skipping repeated URL");
                continue;
            }
            kept.push(candidate);
        }

        info!(raw = raw_count, kept = kept.len(), "Filtered search results");
        kept
    }
}
