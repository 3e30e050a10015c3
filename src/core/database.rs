// src/core/database.rs
//! SQLite connection management and the seen-jobs memory

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, warn};

use crate::core::FsOps;
use crate::hunting::SeenStore;
use crate::types::{Candidate, SeenRecord};

// ===== Core Database Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!("Database connection established: {}", database_path.display());

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database, gone when the pool closes
    pub async fn in_memory() -> Result<Self> {
        // every connection to sqlite::memory: is its own database, so pin the pool to one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_jobs (
                url TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                first_seen_at TEXT NOT NULL,
                query_job_title TEXT NOT NULL,
                query_location TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create seen_jobs table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_seen_jobs_first_seen ON seen_jobs(first_seen_at);",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    pub fn seen_jobs(&self) -> SeenJobRepository {
        SeenJobRepository::new(self.pool.clone())
    }
}

// ===== Seen Jobs Repository =====

#[derive(Clone)]
pub struct SeenJobRepository {
    pool: SqlitePool,
}

impl SeenJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert_if_absent(
        &self,
        candidate: &Candidate,
        query_job_title: &str,
        query_location: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO seen_jobs (url, title, first_seen_at, query_job_title, query_location)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&candidate.url)
        .bind(&candidate.title)
        .bind(Utc::now())
        .bind(query_job_title)
        .bind(query_location)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SeenStore for SeenJobRepository {
    async fn contains(&self, url: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM seen_jobs WHERE url = ?")
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up seen job")?;

        Ok(row.is_some())
    }

    async fn mark_seen(
        &self,
        candidates: &[Candidate],
        query_job_title: &str,
        query_location: &str,
    ) -> Result<usize> {
        let mut inserted = 0;

        for candidate in candidates {
            match self
                .insert_if_absent(candidate, query_job_title, query_location)
                .await
            {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => warn!(url = %candidate.url, error = %e, "Failed to store seen job"),
            }
        }

        Ok(inserted)
    }

    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_jobs")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count seen jobs")?;

        Ok(count)
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM seen_jobs")
            .execute(&self.pool)
            .await
            .context("Failed to clear seen jobs")?;

        info!(removed = result.rows_affected(), "Cleared job memory");
        Ok(result.rows_affected())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<SeenRecord>> {
        let records = sqlx::query_as::<_, SeenRecord>(
            r#"
            SELECT url, title, first_seen_at, query_job_title, query_location
            FROM seen_jobs
            ORDER BY first_seen_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list seen jobs")?;

        Ok(records)
    }
}
