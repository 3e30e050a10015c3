// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use std::sync::Arc;
use tracing::info;

use crate::hunting::Pipeline;
use crate::types::HuntSummary;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, POST, OPTIONS"));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));
    }
}

#[get("/options")]
pub async fn get_options(state: &State<HunterState>) -> Json<OptionsResponse> {
    handlers::get_options_handler(state).await
}

#[get("/resume")]
pub async fn get_resume(state: &State<HunterState>) -> Json<ResumeResponse> {
    handlers::get_resume_handler(state).await
}

#[post("/resume", data = "<request>")]
pub async fn save_resume(
    request: Json<ResumeRequest>,
    state: &State<HunterState>,
) -> Json<ActionResponse> {
    handlers::save_resume_handler(request, state).await
}

#[post("/memory/clear")]
pub async fn clear_memory(
    state: &State<HunterState>,
) -> Result<Json<ActionResponse>, Custom<Json<StandardErrorResponse>>> {
    handlers::clear_memory_handler(state).await
}

#[post("/hunt", data = "<request>")]
pub async fn hunt(
    request: Json<HuntRequest>,
    state: &State<HunterState>,
) -> Result<Json<HuntSummary>, Custom<Json<StandardErrorResponse>>> {
    handlers::hunt_handler(request, state).await
}

#[get("/health")]
pub async fn health(state: &State<HunterState>) -> Json<HealthResponse> {
    handlers::health_handler(state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST",
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "BAD_REQUEST",
        vec!["Send a JSON object with string fields".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR",
        vec!["Try again in a few moments".to_string()],
    ))
}

pub fn build_rocket(pipeline: Arc<Pipeline>, port: u16) -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(HunterState::new(pipeline))
        .register("/api", catchers![bad_request, unprocessable, internal_error])
        .mount(
            "/api",
            routes![
                get_options,
                get_resume,
                save_resume,
                clear_memory,
                hunt,
                health,
                options,
            ],
        )
}

/// Serve the API until shutdown
pub async fn start_web_server(pipeline: Arc<Pipeline>, port: u16) -> Result<()> {
    info!("Starting job hunter API on http://0.0.0.0:{}", port);

    let _rocket = build_rocket(pipeline, port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;

    info!("Job hunter API stopped");
    Ok(())
}
