// src/web/types.rs
use rocket::serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::hunting::{Pipeline, SeenStore};
use crate::types::{JobType, TimeFilter};

/// Shared state handed to every route
pub struct HunterState {
    pub pipeline: Arc<Pipeline>,
    /// Process-local only, lost on restart
    pub resume: RwLock<String>,
}

impl HunterState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            resume: RwLock::new(String::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn SeenStore> {
        self.pipeline.store()
    }
}

// ===== Requests =====

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct HuntRequest {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub time_filter: Option<String>,
    pub job_type: Option<String>,
    pub resume_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ResumeRequest {
    pub resume_text: String,
}

// ===== Responses =====

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct OptionItem {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<TimeFilter> for OptionItem {
    fn from(filter: TimeFilter) -> Self {
        Self {
            value: filter.as_str(),
            label: filter.label(),
        }
    }
}

impl From<JobType> for OptionItem {
    fn from(job_type: JobType) -> Self {
        Self {
            value: job_type.as_str(),
            label: job_type.label(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct OptionsResponse {
    pub job_roles: Vec<&'static str>,
    pub locations: Vec<&'static str>,
    pub time_filters: Vec<OptionItem>,
    pub job_types: Vec<OptionItem>,
    pub memory_count: i64,
    pub has_resume: bool,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResumeResponse {
    pub resume_text: String,
    pub length: usize,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub action: String,
}

impl ActionResponse {
    pub fn success(message: String, action: &str) -> Self {
        Self {
            success: true,
            message,
            action: action.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            error_code: error_code.to_string(),
            suggestions,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

// ===== Dropdown data =====

pub const JOB_ROLES: &[&str] = &[
    // AI/ML
    "Machine Learning Engineer",
    "AI Research Intern",
    "Data Scientist",
    "Data Analyst",
    "Deep Learning Engineer",
    "NLP Engineer",
    "Computer Vision Engineer",
    "MLOps Engineer",
    // Web
    "MERN Stack Developer",
    "Full Stack Developer",
    "Frontend Developer",
    "Backend Developer",
    "React JS Developer",
    "Node.js Developer",
    "Next.js Developer",
    "Angular Developer",
    "Vue.js Developer",
    // Software engineering
    "Junior Software Engineer",
    "Software Engineer",
    "Senior Software Engineer",
    "Python Developer",
    "Java Developer",
    "Go Developer",
    "Rust Developer",
    "C++ Developer",
    // Mobile
    "Android Developer",
    "iOS Developer",
    "Flutter Developer",
    "React Native Developer",
    // Infrastructure
    "DevOps Engineer",
    "Cloud Engineer",
    "Site Reliability Engineer",
    "AWS Solutions Architect",
    "Kubernetes Engineer",
    // Data
    "Data Engineer",
    "Database Administrator",
    "Business Intelligence Analyst",
    "ETL Developer",
    // Other
    "Cybersecurity Analyst",
    "Blockchain Developer",
    "QA Engineer",
    "Technical Writer",
    "UI/UX Designer",
    "Product Manager",
    "Scrum Master",
];

pub const LOCATIONS: &[&str] = &[
    "Remote",
    "India",
    "Bangalore",
    "Hyderabad",
    "Mumbai",
    "Delhi NCR",
    "Chennai",
    "Pune",
    "United States",
    "United Kingdom",
    "Germany",
    "Canada",
    "Australia",
    "Singapore",
    "Dubai",
    "Netherlands",
    "Japan",
];
