// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::types::{JobType, TimeFilter};
use crate::web::types::*;

pub async fn get_options_handler(state: &State<HunterState>) -> Json<OptionsResponse> {
    let memory_count = match state.store().count().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count seen jobs: {}", e);
            0
        }
    };

    Json(OptionsResponse {
        job_roles: JOB_ROLES.to_vec(),
        locations: LOCATIONS.to_vec(),
        time_filters: TimeFilter::ALL.into_iter().map(OptionItem::from).collect(),
        job_types: JobType::ALL.into_iter().map(OptionItem::from).collect(),
        memory_count,
        has_resume: !state.resume.read().await.trim().is_empty(),
    })
}

pub async fn clear_memory_handler(
    state: &State<HunterState>,
) -> Result<Json<ActionResponse>, Custom<Json<StandardErrorResponse>>> {
    match state.store().clear().await {
        Ok(removed) => {
            info!("Job memory cleared ({} entries)", removed);
            Ok(Json(ActionResponse::success(
                format!("Forgot {} previously seen jobs", removed),
                "cleared",
            )))
        }
        Err(e) => {
            error!("Failed to clear job memory: {}", e);
            Err(Custom(
                Status::InternalServerError,
                Json(StandardErrorResponse::new(
                    format!("Failed to clear job memory: {}", e),
                    "STORE_ERROR",
                    vec!["Check the database file permissions".to_string()],
                )),
            ))
        }
    }
}

pub async fn health_handler(state: &State<HunterState>) -> Json<HealthResponse> {
    let database = state.store().count().await.is_ok();
    info!("Health check (database ok: {})", database);

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
