// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::utils::resolve_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub search: SearchSettings,
    pub enrichment: EnrichmentSettings,
    pub ranking: RankingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    pub search_depth: String,
    pub max_results: usize,
    pub max_candidates: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    pub reader_url: String,
    pub max_enrich: usize,
    pub concurrency: usize,
    pub timeout_seconds: u64,
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub content_chars: usize,
    pub resume_chars: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/jobs.db"),
            log_file: None,
            search: SearchSettings::default(),
            enrichment: EnrichmentSettings::default(),
            ranking: RankingSettings::default(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            search_depth: "basic".to_string(),
            max_results: 25,
            max_candidates: 20,
            timeout_seconds: 30,
        }
    }
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            reader_url: "https://r.jina.ai/".to_string(),
            max_enrich: 8,
            concurrency: 3,
            timeout_seconds: 8,
            max_chars: 3000,
        }
    }
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.3,
            timeout_seconds: 60,
            content_chars: 2500,
            resume_chars: 2000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load the section of `config_path` matching the current environment
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        if !config_path.exists() {
            warn!(
                "{} not found, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default().resolved());
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, &environment)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn get_environment() -> String {
        std::env::var("HEADHUNTER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(env_config.resolved())
    }

    fn resolved(mut self) -> Self {
        self.database_path = resolve_path(&self.database_path);
        self.log_file = self.log_file.as_ref().map(resolve_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
local:
  database_path: /tmp/hunter/jobs.db
  enrichment:
    max_enrich: 4
production:
  database_path: /app/data/jobs.db
  ranking:
    model: llama-3.1-8b-instant
"#;
        let local = EnvironmentConfig::from_yaml(yaml, "local").unwrap();
        assert_eq!(local.database_path, PathBuf::from("/tmp/hunter/jobs.db"));
        assert_eq!(local.enrichment.max_enrich, 4);
        assert_eq!(local.enrichment.concurrency, 3);
        assert_eq!(local.ranking.model, "llama-3.3-70b-versatile");

        let production = EnvironmentConfig::from_yaml(yaml, "production").unwrap();
        assert_eq!(production.ranking.model, "llama-3.1-8b-instant");
        assert_eq!(production.search.max_candidates, 20);
    }

    #[test]
    fn test_unknown_environment_uses_local() {
        let yaml = "local:\n  database_path: /srv/local.db\n";
        let config = EnvironmentConfig::from_yaml(yaml, "staging").unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/local.db"));
    }

    #[test]
    fn test_relative_paths_are_resolved() {
        let config = EnvironmentConfig::default().resolved();
        assert!(config.database_path.is_absolute());
        assert!(config.database_path.ends_with("data/jobs.db"));
    }
}
