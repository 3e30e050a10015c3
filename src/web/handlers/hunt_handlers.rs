// src/web/handlers/hunt_handlers.rs
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::types::{HuntSummary, SearchRequest};
use crate::web::types::*;

pub async fn hunt_handler(
    request: Json<HuntRequest>,
    state: &State<HunterState>,
) -> Result<Json<HuntSummary>, Custom<Json<StandardErrorResponse>>> {
    let request = request.into_inner();

    let search = match SearchRequest::parse(
        request.job_title.as_deref(),
        request.location.as_deref(),
        request.time_filter.as_deref(),
        request.job_type.as_deref(),
    ) {
        Ok(search) => search,
        Err(e) => {
            warn!("Rejected hunt request: {}", e);
            return Err(Custom(
                Status::BadRequest,
                Json(StandardErrorResponse::new(
                    e.to_string(),
                    "INVALID_INPUT",
                    vec![
                        "Provide both job_title and location".to_string(),
                        "time_filter: past_day, past_week or past_month".to_string(),
                        "job_type: any, internship, fulltime, parttime, contract or freelance"
                            .to_string(),
                    ],
                )),
            ));
        }
    };

    let resume = match request.resume_text {
        Some(text) => text,
        None => state.resume.read().await.clone(),
    };
    info!(
        resume_chars = resume.chars().count(),
        "Hunt requested for '{}' in '{}'",
        search.job_title(),
        search.location()
    );

    let result = state.pipeline.run(&search, Some(resume.as_str())).await;
    Ok(Json(result.summary()))
}
