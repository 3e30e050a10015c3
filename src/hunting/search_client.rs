// src/hunting/search_client.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::environment::SearchSettings;
use crate::types::{Candidate, JobType, SearchRequest, TimeFilter};

/// Source of raw job-posting candidates
#[async_trait]
pub trait JobSearcher: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>>;
}

/// Search terms appended to the job title for each job type
pub fn job_type_keywords(job_type: JobType) -> &'static str {
    match job_type {
        JobType::Internship => "internship OR intern OR trainee",
        JobType::FullTime => "full-time OR full time OR permanent",
        JobType::PartTime => "part-time OR part time",
        JobType::Contract => "contract OR freelance OR temporary",
        JobType::Freelance => "freelance OR remote contract",
        JobType::Any => "jobs",
    }
}

pub fn build_query(request: &SearchRequest) -> String {
    format!(
        "{} {} in {}",
        request.job_title(),
        job_type_keywords(request.job_type()),
        request.location()
    )
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
    time_range: &'static str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

fn time_range(filter: TimeFilter) -> &'static str {
    match filter {
        TimeFilter::PastDay => "day",
        TimeFilter::PastWeek => "week",
        TimeFilter::PastMonth => "month",
    }
}

/// Tavily web search; returns page title, URL and an extracted text snippet
pub struct TavilySearcher {
    client: Client,
    api_key: String,
    settings: SearchSettings,
}

impl TavilySearcher {
    pub fn new(api_key: String, settings: SearchSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }
}

#[async_trait]
impl JobSearcher for TavilySearcher {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>> {
        let query = build_query(request);
        info!(query = %query, "Searching Tavily");

        let body = TavilyRequest {
            query: &query,
            search_depth: &self.settings.search_depth,
            max_results: self.settings.max_results,
            time_range: time_range(request.time_filter()),
        };

        let response = self
            .client
            .post(format!(
                "{}/search",
                self.settings.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send Tavily search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error {}: {}", status, body);
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .context("Failed to parse Tavily response")?;

        let candidates: Vec<Candidate> = tavily_response
            .results
            .into_iter()
            .filter(|r| !r.url.trim().is_empty())
            .map(|r| Candidate::new(r.url.trim(), &r.title, &r.content, request))
            .collect();

        info!(count = candidates.len(), "Tavily returned results");
        Ok(candidates)
    }
}

/// Used when no search API key is configured
pub struct NoopSearcher;

#[async_trait]
impl JobSearcher for NoopSearcher {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<Candidate>> {
        warn!("NoopSearcher: search called but no search API key configured");
        Ok(vec![])
    }
}
