// src/hunting/content_enricher.rs
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::environment::EnrichmentSettings;
use crate::types::Candidate;
use crate::utils::{clean_text, short_title, truncate_chars};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Reader returned HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Page had no readable text")]
    Empty,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}

/// Fetches the readable text of a posting page
#[async_trait]
pub trait PageReader: Send + Sync {
    async fn read(&self, url: &str) -> Result<String, FetchError>;
}

/// Jina AI reader: prefixes the target URL and returns LLM-ready plain text
pub struct JinaReader {
    client: Client,
    reader_url: String,
}

impl JinaReader {
    pub fn new(settings: &EnrichmentSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            reader_url: settings.reader_url.clone(),
        })
    }
}

#[async_trait]
impl PageReader for JinaReader {
    async fn read(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(format!("{}{}", self.reader_url, url))
            .header("Accept", "text/plain")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let text = if looks_like_html(&body) {
            html_to_text(&body)
        } else {
            body.trim().to_string()
        };

        if text.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(text)
    }
}

fn looks_like_html(body: &str) -> bool {
    let head = truncate_chars(body.trim_start(), 200).to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html") || head.contains("<body")
}

/// Visible text of the main content area, falling back to the whole body
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selectors = ["main", "article", "[class*='description']", "body"];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

/// Replaces snippets with full page text for a bounded prefix of candidates
pub struct ContentEnricher {
    reader: Arc<dyn PageReader>,
    concurrency: usize,
    max_chars: usize,
}

impl ContentEnricher {
    pub fn new(reader: Arc<dyn PageReader>, concurrency: usize, max_chars: usize) -> Self {
        Self {
            reader,
            concurrency: concurrency.max(1),
            max_chars,
        }
    }

    pub fn from_settings(reader: Arc<dyn PageReader>, settings: &EnrichmentSettings) -> Self {
        Self::new(reader, settings.concurrency, settings.max_chars)
    }

    /// Only the first `max_enrich` candidates are fetched; everything else, and every
    /// failed fetch, keeps its snippet. Returns once all fetches have settled.
    pub async fn enrich(&self, candidates: Vec<Candidate>, max_enrich: usize) -> Vec<Candidate> {
        let split = max_enrich.min(candidates.len());
        let mut candidates = candidates;
        let rest = candidates.split_off(split);

        info!(count = split, "Deep reading top job pages");

        let enriched: Vec<Candidate> = stream::iter(candidates.into_iter().map(|candidate| {
            let reader = Arc::clone(&self.reader);
            async move { self.enrich_one(reader.as_ref(), candidate).await }
        }))
        .buffered(self.concurrency)
        .collect()
        .await;

        enriched
            .into_iter()
            .chain(rest.into_iter().map(Candidate::with_snippet_as_content))
            .collect()
    }

    async fn enrich_one(&self, reader: &dyn PageReader, candidate: Candidate) -> Candidate {
        match reader.read(&candidate.url).await {
            Ok(text) => {
                debug!(title = %short_title(&candidate.title), "Deep read succeeded");
                let mut candidate = candidate;
                candidate.full_content = Some(truncate_chars(&text, self.max_chars).to_string());
                candidate
            }
            Err(e) => {
                warn!(url = %candidate.url, error = %e, "Deep read failed, keeping snippet");
                candidate.with_snippet_as_content()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobType, SearchRequest, TimeFilter};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingReader {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl CountingReader {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageReader for CountingReader {
        async fn read(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());

            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("broken") {
                Err(FetchError::Status(503))
            } else {
                Ok(format!("full text of {} {}", url, "x".repeat(100)))
            }
        }
    }

    fn candidates(count: usize) -> Vec<Candidate> {
        let request =
            SearchRequest::new("Data Analyst", "Remote", TimeFilter::PastWeek, JobType::Any)
                .unwrap();
        (0..count)
            .map(|i| {
                Candidate::new(
                    &format!("https://jobs.example.com/job/{}", i),
                    &format!("Analyst {}", i),
                    &format!("snippet {}", i),
                    &request,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_only_prefix_is_enriched() {
        let reader = Arc::new(CountingReader::new());
        let enricher = ContentEnricher::new(reader.clone(), 3, 3000);

        let result = enricher.enrich(candidates(10), 3).await;

        assert_eq!(reader.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.len(), 10);
        for (i, candidate) in result.iter().enumerate() {
            assert_eq!(candidate.url, format!("https://jobs.example.com/job/{}", i));
            if i < 3 {
                assert!(candidate.content().starts_with("full text of"));
            } else {
                assert_eq!(candidate.full_content.as_deref(), Some(candidate.snippet.as_str()));
            }
        }

        let mut fetched = reader.urls.lock().unwrap().clone();
        fetched.sort();
        assert_eq!(
            fetched,
            [
                "https://jobs.example.com/job/0",
                "https://jobs.example.com/job/1",
                "https://jobs.example.com/job/2"
            ]
        );
    }

    #[tokio::test]
    async fn test_parallelism_is_bounded() {
        let reader = Arc::new(CountingReader::new());
        let enricher = ContentEnricher::new(reader.clone(), 3, 3000);

        enricher.enrich(candidates(9), 9).await;

        assert_eq!(reader.calls.load(Ordering::SeqCst), 9);
        assert!(reader.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_snippet_and_truncate() {
        let reader = Arc::new(CountingReader::new());
        let enricher = ContentEnricher::new(reader, 2, 20);

        let mut batch = candidates(2);
        batch[0].url = "https://broken.example.com/job/0".to_string();

        let result = enricher.enrich(batch, 5).await;
        assert_eq!(result[0].content(), "snippet 0");
        assert_eq!(result[1].content().chars().count(), 20);
    }

    #[test]
    fn test_html_to_text_prefers_main_content() {
        let html = r#"<!DOCTYPE html><html><body><nav>Menu</nav>
            <main><h1>Rust Engineer</h1>
            <p>Build   fast   things.</p></main></body></html>"#;
        assert!(looks_like_html(html));
        assert_eq!(html_to_text(html), "Rust Engineer Build fast things.");
        assert!(!looks_like_html("Title: Rust Engineer\n\nMarkdown Content:"));
    }
}
