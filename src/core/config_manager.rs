// src/core/config_manager.rs
//! Assembles file-based settings and environment secrets into one configuration

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::core::FsOps;
use crate::environment::EnvironmentConfig;

const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Clone, Default)]
pub struct ServiceConfig {
    pub search_api_key: Option<String>,
    pub ranking_api_key: Option<String>,
    pub ranking_backup_api_key: Option<String>,
    pub port: u16,
}

// keys stay out of logs
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("search_api_key", &self.search_api_key.is_some())
            .field("ranking_api_key", &self.ranking_api_key.is_some())
            .field("ranking_backup_api_key", &self.ranking_backup_api_key.is_some())
            .field("port", &self.port)
            .finish()
    }
}

impl ConfigManager {
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = EnvironmentConfig::load(config_path)?;
        let service = Self::load_service()?;

        Ok(Self {
            environment,
            service,
        })
    }

    fn load_service() -> Result<ServiceConfig> {
        let port = match std::env::var("ROCKET_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .context("ROCKET_PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let service = ServiceConfig {
            search_api_key: non_empty_var("TAVILY_API_KEY"),
            ranking_api_key: non_empty_var("GROQ_API_KEY"),
            ranking_backup_api_key: non_empty_var("GROQ_API_KEY_BACKUP"),
            port,
        };

        if service.search_api_key.is_none() {
            warn!("TAVILY_API_KEY not set, searches will return no results");
        }
        if service.ranking_api_key.is_none() {
            warn!("GROQ_API_KEY not set, ranking will report a configuration error");
        }
        info!(
            backup = service.ranking_backup_api_key.is_some(),
            "Ranking credentials loaded"
        );

        Ok(service)
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.environment.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
