// src/lib.rs
pub mod cli;
pub mod core;
pub mod environment;
pub mod hunting;
pub mod types;
pub mod utils;
pub mod web;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::core::ConfigManager;
use crate::hunting::{
    ContentEnricher, GroqBackend, JinaReader, JobSearcher, NoopSearcher, Pipeline, Ranker,
    SeenStore, TavilySearcher,
};

pub use web::start_web_server;

/// Wire the production backends around an already opened store
pub fn build_pipeline(config: &ConfigManager, store: Arc<dyn SeenStore>) -> Result<Pipeline> {
    let settings = &config.environment;

    let searcher: Arc<dyn JobSearcher> = match &config.service.search_api_key {
        Some(key) => Arc::new(TavilySearcher::new(key.clone(), settings.search.clone())?),
        None => Arc::new(NoopSearcher),
    };

    let reader = Arc::new(JinaReader::new(&settings.enrichment)?);
    let enricher = ContentEnricher::from_settings(reader, &settings.enrichment);

    let ranker = Ranker::new(
        Arc::new(GroqBackend::new(&settings.ranking)?),
        config.service.ranking_api_key.clone(),
        config.service.ranking_backup_api_key.clone(),
        settings.ranking.clone(),
    );

    info!(
        model = %settings.ranking.model,
        backup = ranker.has_backup(),
        max_candidates = settings.search.max_candidates,
        max_enrich = settings.enrichment.max_enrich,
        "Pipeline assembled"
    );

    Ok(Pipeline::new(
        searcher,
        store,
        enricher,
        ranker,
        settings.search.max_candidates,
        settings.enrichment.max_enrich,
    ))
}
