// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use crate::core::FsOps;
use crate::hunting::{Pipeline, SeenStore};
use crate::types::{HuntResult, JobType, SearchRequest, TimeFilter};

#[derive(Parser, Debug)]
#[command(name = "headhunter")]
#[command(about = "Find fresh job postings, skip the ones you have seen, and rank the rest")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file with local/production sections
    #[arg(long, global = true, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Keep seen-job memory in RAM only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP API (default)
    Serve {
        /// Overrides ROCKET_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a single hunt and print the report
    Hunt(HuntArgs),
    /// Inspect or reset the seen-job memory
    Memory {
        #[command(subcommand)]
        action: MemoryCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct HuntArgs {
    #[arg(long)]
    pub job_title: String,

    #[arg(long)]
    pub location: String,

    /// past_day, past_week or past_month
    #[arg(long, default_value = "past_week")]
    pub time_filter: String,

    /// any, internship, fulltime, parttime, contract or freelance
    #[arg(long, default_value = "any")]
    pub job_type: String,

    /// Plain-text resume used for fit scoring
    #[arg(long)]
    pub resume: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MemoryCommand {
    /// Number of remembered job URLs
    Count,
    /// Forget every remembered job URL
    Clear,
    /// Most recently remembered jobs
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { port: None })
    }
}

impl HuntArgs {
    pub fn search_request(&self) -> Result<SearchRequest> {
        let time_filter: TimeFilter = self.time_filter.parse()?;
        let job_type: JobType = self.job_type.parse()?;
        Ok(SearchRequest::new(
            &self.job_title,
            &self.location,
            time_filter,
            job_type,
        )?)
    }
}

pub async fn handle_hunt_command(pipeline: &Pipeline, args: &HuntArgs) -> Result<()> {
    let request = args.search_request()?;

    let resume = match &args.resume {
        Some(path) => Some(
            FsOps::read_file_safe(path)
                .await
                .with_context(|| format!("Failed to read resume {}", path.display()))?,
        ),
        None => None,
    };

    let result = pipeline.run(&request, resume.as_deref()).await;
    print_hunt_result(&result);
    Ok(())
}

fn print_hunt_result(result: &HuntResult) {
    println!(
        "Found {} jobs ({} new, {} previously seen)",
        result.total_count, result.new_count, result.seen_count
    );
    println!("{}", "-".repeat(60));
    for candidate in &result.candidates {
        let marker = if candidate.is_new() { "NEW " } else { "    " };
        println!("{} {}", marker, candidate.title);
        println!("     {}", candidate.url);
    }
    println!("{}", "-".repeat(60));
    println!("{}", result.report);
}

pub async fn handle_memory_command(store: Arc<dyn SeenStore>, action: &MemoryCommand) -> Result<()> {
    match action {
        MemoryCommand::Count => {
            let count = store.count().await?;
            println!("{} jobs in memory", count);
        }

        MemoryCommand::Clear => match store.clear().await {
            Ok(removed) => println!("✅ Forgot {} jobs", removed),
            Err(e) => {
                error!("Failed to clear memory: {}", e);
                return Err(e);
            }
        },

        MemoryCommand::List { limit } => {
            let records = store.recent(*limit).await?;
            if records.is_empty() {
                println!("No jobs in memory.");
                return Ok(());
            }

            println!(
                "{:<17} {:<40} {:<25} {}",
                "First seen", "Title", "Query", "URL"
            );
            println!("{}", "-".repeat(110));
            for record in records {
                println!(
                    "{:<17} {:<40} {:<25} {}",
                    record.first_seen_at.format("%Y-%m-%d %H:%M").to_string(),
                    crate::utils::truncate_chars(&record.title, 38),
                    format!("{} / {}", record.query_job_title, record.query_location),
                    record.url
                );
            }
        }
    }

    Ok(())
}
