// src/hunting/dedup.rs
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::types::{Candidate, SeenRecord};

/// Persistent memory of URLs already surfaced to the user
#[async_trait]
pub trait SeenStore: Send + Sync {
    async fn contains(&self, url: &str) -> Result<bool>;

    /// Insert-if-absent per candidate; returns how many rows were new.
    /// A failing row is logged and skipped, the rest of the batch still goes in.
    async fn mark_seen(
        &self,
        candidates: &[Candidate],
        query_job_title: &str,
        query_location: &str,
    ) -> Result<usize>;

    async fn count(&self) -> Result<i64>;

    /// Irreversibly forget every seen URL; returns the number removed
    async fn clear(&self) -> Result<u64>;

    async fn recent(&self, limit: i64) -> Result<Vec<SeenRecord>>;
}

/// Splits candidates into never-seen and already-seen, read-only on the store
pub struct DedupFilter {
    store: Arc<dyn SeenStore>,
}

impl DedupFilter {
    pub fn new(store: Arc<dyn SeenStore>) -> Self {
        Self { store }
    }

    /// Relative input order is preserved inside each half
    pub async fn partition(&self, candidates: Vec<Candidate>) -> (Vec<Candidate>, Vec<Candidate>) {
        let mut new_jobs = Vec::new();
        let mut seen_jobs = Vec::new();

        for candidate in candidates {
            let seen = match self.store.contains(&candidate.url).await {
                Ok(seen) => seen,
                Err(e) => {
                    warn!(url = %candidate.url, error = %e, "Seen lookup failed, treating as new");
                    false
                }
            };

            if seen {
                seen_jobs.push(candidate.with_seen_status(false));
            } else {
                new_jobs.push(candidate.with_seen_status(true));
            }
        }

        (new_jobs, seen_jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;
    use crate::types::{JobType, SearchRequest, TimeFilter};

    struct BrokenStore;

    #[async_trait]
    impl SeenStore for BrokenStore {
        async fn contains(&self, _url: &str) -> Result<bool> {
            anyhow::bail!("disk I/O error")
        }
        async fn mark_seen(&self, _: &[Candidate], _: &str, _: &str) -> Result<usize> {
            anyhow::bail!("disk I/O error")
        }
        async fn count(&self) -> Result<i64> {
            anyhow::bail!("disk I/O error")
        }
        async fn clear(&self) -> Result<u64> {
            anyhow::bail!("disk I/O error")
        }
        async fn recent(&self, _limit: i64) -> Result<Vec<SeenRecord>> {
            anyhow::bail!("disk I/O error")
        }
    }

    fn candidates(urls: &[&str]) -> Vec<Candidate> {
        let request =
            SearchRequest::new("Data Analyst", "Remote", TimeFilter::PastWeek, JobType::Any)
                .unwrap();
        urls.iter()
            .map(|url| Candidate::new(url, "Analyst", "snippet", &request))
            .collect()
    }

    #[tokio::test]
    async fn test_partition_is_exact_and_ordered() {
        let db = Database::in_memory().await.unwrap();
        let store = Arc::new(db.seen_jobs());
        store
            .mark_seen(
                &candidates(&["https://b.io/job/2", "https://d.io/job/4"]),
                "Data Analyst",
                "Remote",
            )
            .await
            .unwrap();

        let input = candidates(&[
            "https://a.io/job/1",
            "https://b.io/job/2",
            "https://c.io/job/3",
            "https://d.io/job/4",
            "https://e.io/job/5",
        ]);
        let total = input.len();

        let filter = DedupFilter::new(store.clone());
        let (new_jobs, seen_jobs) = filter.partition(input).await;

        assert_eq!(new_jobs.len() + seen_jobs.len(), total);
        let new_urls: Vec<&str> = new_jobs.iter().map(|c| c.url.as_str()).collect();
        let seen_urls: Vec<&str> = seen_jobs.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            new_urls,
            ["https://a.io/job/1", "https://c.io/job/3", "https://e.io/job/5"]
        );
        assert_eq!(seen_urls, ["https://b.io/job/2", "https://d.io/job/4"]);

        for candidate in &new_jobs {
            assert!(candidate.is_new());
            assert!(!store.contains(&candidate.url).await.unwrap());
        }
        for candidate in &seen_jobs {
            assert!(!candidate.is_new());
            assert!(store.contains(&candidate.url).await.unwrap());
        }

        // partition never writes
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_lookup_failure_keeps_candidate_as_new() {
        let filter = DedupFilter::new(Arc::new(BrokenStore));
        let (new_jobs, seen_jobs) = filter
            .partition(candidates(&["https://a.io/job/1", "https://b.io/job/2"]))
            .await;

        assert_eq!(new_jobs.len(), 2);
        assert!(seen_jobs.is_empty());
    }
}
