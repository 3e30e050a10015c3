// src/web/handlers/resume_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::web::types::*;

pub async fn get_resume_handler(state: &State<HunterState>) -> Json<ResumeResponse> {
    let resume = state.resume.read().await.clone();
    Json(ResumeResponse {
        length: resume.chars().count(),
        resume_text: resume,
    })
}

pub async fn save_resume_handler(
    request: Json<ResumeRequest>,
    state: &State<HunterState>,
) -> Json<ActionResponse> {
    let text = request.into_inner().resume_text.trim().to_string();
    let length = text.chars().count();

    *state.resume.write().await = text;
    info!("Resume updated ({} chars)", length);

    Json(ActionResponse::success(
        format!("Resume saved ({} characters)", length),
        "saved",
    ))
}
