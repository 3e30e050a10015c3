// src/hunting/ranker.rs
use async_trait::async_trait;
use chrono::Local;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use super::prompt::{build_prompt, RankingPrompt};
use crate::environment::RankingSettings;
use crate::types::{Candidate, SearchRequest};

pub const EMPTY_RANKING_REPORT: &str = "No jobs found to analyze.";

const RATE_LIMIT_CODE: &str = "rate_limit_exceeded";

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unreadable response: {0}")]
    Parse(String),
}

impl BackendError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BackendError::RateLimited(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum RankError {
    #[error("Ranking unavailable: no primary credential configured")]
    MissingCredential,

    #[error("Ranking failed: {0}")]
    PrimaryFailed(BackendError),

    #[error("Ranking failed (backup also failed): primary: {primary}; backup: {backup}")]
    BackupFailed {
        primary: BackendError,
        backup: BackendError,
    },
}

/// One prompt in, one report out
#[async_trait]
pub trait RankingBackend: Send + Sync {
    async fn complete(&self, credential: &str, prompt: &RankingPrompt)
        -> Result<String, BackendError>;
}

// ===== Groq (OpenAI-compatible chat completions) =====

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Map a failed HTTP exchange onto a typed error using the status and the
/// structured `error.code` field
fn classify_failure(status: StatusCode, body: &str) -> BackendError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let code_is_rate_limit = envelope
        .as_ref()
        .and_then(|e| e.error.code.as_deref())
        .is_some_and(|code| code == RATE_LIMIT_CODE);

    if status == StatusCode::TOO_MANY_REQUESTS || code_is_rate_limit {
        BackendError::RateLimited(message)
    } else {
        BackendError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

pub struct GroqBackend {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GroqBackend {
    pub fn new(settings: &RankingSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl RankingBackend for GroqBackend {
    async fn complete(
        &self,
        credential: &str,
        prompt: &RankingPrompt,
    ) -> Result<String, BackendError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Groq API error {}: {}", status, body);
            return Err(classify_failure(status, &body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::Parse("response had no message content".to_string()))
    }
}

// ===== Ranker =====

/// Ranks candidates through the backend, retrying once on a backup
/// credential when (and only when) the primary is rate limited
pub struct Ranker {
    backend: Arc<dyn RankingBackend>,
    primary_key: Option<String>,
    backup_key: Option<String>,
    settings: RankingSettings,
}

impl Ranker {
    pub fn new(
        backend: Arc<dyn RankingBackend>,
        primary_key: Option<String>,
        backup_key: Option<String>,
        settings: RankingSettings,
    ) -> Self {
        Self {
            backend,
            primary_key,
            backup_key,
            settings,
        }
    }

    pub fn has_backup(&self) -> bool {
        self.backup_key.is_some()
    }

    pub async fn rank(
        &self,
        candidates: &[Candidate],
        request: &SearchRequest,
        resume_text: Option<&str>,
    ) -> Result<String, RankError> {
        if candidates.is_empty() {
            return Ok(EMPTY_RANKING_REPORT.to_string());
        }

        let primary = self
            .primary_key
            .as_deref()
            .ok_or(RankError::MissingCredential)?;

        let prompt = build_prompt(
            candidates,
            request,
            resume_text,
            Local::now().date_naive(),
            self.settings.content_chars,
            self.settings.resume_chars,
        );

        info!(candidates = candidates.len(), "Ranking with primary credential");
        let primary_error = match self.backend.complete(primary, &prompt).await {
            Ok(report) => return Ok(report),
            Err(e) => e,
        };

        if !primary_error.is_rate_limited() {
            warn!(error = %primary_error, "Ranking failed, not retryable");
            return Err(RankError::PrimaryFailed(primary_error));
        }

        let Some(backup) = self.backup_key.as_deref() else {
            warn!(error = %primary_error, "Primary credential rate limited, no backup configured");
            return Err(RankError::PrimaryFailed(primary_error));
        };

        warn!(error = %primary_error, "Primary credential rate limited, retrying with backup");
        match self.backend.complete(backup, &prompt).await {
            Ok(report) => {
                info!("Backup credential succeeded");
                Ok(report)
            }
            Err(backup_error) => {
                error!(primary = %primary_error, backup = %backup_error, "Backup credential failed");
                Err(RankError::BackupFailed {
                    primary: primary_error,
                    backup: backup_error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobType, TimeFilter};
    use std::sync::Mutex;

    /// Replays scripted outcomes and records every call
    struct ScriptedBackend {
        outcomes: Mutex<Vec<Result<String, BackendError>>>,
        calls: Mutex<Vec<(String, RankingPrompt)>>,
    }

    impl ScriptedBackend {
        fn new(outcomes: Vec<Result<String, BackendError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RankingBackend for ScriptedBackend {
        async fn complete(
            &self,
            credential: &str,
            prompt: &RankingPrompt,
        ) -> Result<String, BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((credential.to_string(), prompt.clone()));
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                Err(BackendError::Network("unscripted call".to_string()))
            } else {
                outcomes.remove(0)
            }
        }
    }

    fn request() -> SearchRequest {
        SearchRequest::new("Data Analyst", "Remote", TimeFilter::PastDay, JobType::Any).unwrap()
    }

    fn candidates() -> Vec<Candidate> {
        vec![Candidate::new(
            "https://boards.greenhouse.io/acme/jobs/123456",
            "Data Analyst",
            "Posted today",
            &request(),
        )]
    }

    fn ranker(backend: Arc<ScriptedBackend>, primary: Option<&str>, backup: Option<&str>) -> Ranker {
        Ranker::new(
            backend,
            primary.map(String::from),
            backup.map(String::from),
            RankingSettings::default(),
        )
    }

    fn rate_limited() -> BackendError {
        BackendError::RateLimited("Rate limit reached for model".to_string())
    }

    #[tokio::test]
    async fn test_rate_limit_fails_over_to_backup() {
        let backend = ScriptedBackend::new(vec![Err(rate_limited()), Ok("backup report".into())]);
        let ranker = ranker(backend.clone(), Some("primary"), Some("backup"));

        let report = ranker.rank(&candidates(), &request(), None).await.unwrap();

        assert_eq!(report, "backup report");
        assert_eq!(backend.call_count(), 2);

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].0, "primary");
        assert_eq!(calls[1].0, "backup");
        assert_eq!(calls[0].1, calls[1].1);
    }

    #[tokio::test]
    async fn test_rate_limit_without_backup_is_terminal() {
        let backend = ScriptedBackend::new(vec![Err(rate_limited()), Ok("unused".into())]);
        let ranker = ranker(backend.clone(), Some("primary"), None);

        let err = ranker.rank(&candidates(), &request(), None).await.unwrap_err();

        assert!(matches!(err, RankError::PrimaryFailed(BackendError::RateLimited(_))));
        assert!(err.to_string().starts_with("Ranking failed: "));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::Api {
                status: 401,
                message: "Invalid API Key".into(),
            }),
            Ok("unused".into()),
        ]);
        let ranker = ranker(backend.clone(), Some("primary"), Some("backup"));

        let err = ranker.rank(&candidates(), &request(), None).await.unwrap_err();

        assert!(matches!(err, RankError::PrimaryFailed(BackendError::Api { status: 401, .. })));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_both_credentials_failing_names_both() {
        let backend = ScriptedBackend::new(vec![
            Err(rate_limited()),
            Err(BackendError::Network("connection reset".into())),
        ]);
        let ranker = ranker(backend.clone(), Some("primary"), Some("backup"));

        let err = ranker.rank(&candidates(), &request(), None).await.unwrap_err();
        let message = err.to_string();

        assert_eq!(backend.call_count(), 2);
        assert!(message.starts_with("Ranking failed (backup also failed)"));
        assert!(message.contains("primary: rate limited"));
        assert!(message.contains("backup: network error: connection reset"));
    }

    #[tokio::test]
    async fn test_missing_primary_makes_no_call() {
        let backend = ScriptedBackend::new(vec![Ok("unused".into())]);
        let ranker = ranker(backend.clone(), None, Some("backup"));

        let err = ranker.rank(&candidates(), &request(), None).await.unwrap_err();

        assert!(matches!(err, RankError::MissingCredential));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let ranker = ranker(backend.clone(), Some("primary"), None);

        let report = ranker.rank(&[], &request(), None).await.unwrap();

        assert_eq!(report, EMPTY_RANKING_REPORT);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_failure_classification_uses_structured_fields() {
        assert!(classify_failure(StatusCode::TOO_MANY_REQUESTS, "").is_rate_limited());

        let body = r#"{"error":{"message":"Rate limit reached","type":"tokens","code":"rate_limit_exceeded"}}"#;
        let err = classify_failure(StatusCode::BAD_REQUEST, body);
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "rate limited: Rate limit reached");

        let body = r#"{"error":{"message":"Invalid API Key","code":"invalid_api_key"}}"#;
        assert!(matches!(
            classify_failure(StatusCode::UNAUTHORIZED, body),
            BackendError::Api { status: 401, ref message } if message == "Invalid API Key"
        ));

        // a 429 mentioned in free text is not a rate-limit signal
        assert!(!classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "upstream said 429").is_rate_limited());
    }
}
