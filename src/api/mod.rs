use axum::extract::Path;
use axum::routing::post;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::error;

use crate::auth::Viewer;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{AvailableRoomsRequest, CancelRequest, Classroom, ClassDetail, PostponeRequest, TimetableEntry};
use crate::schedule;
use crate::services::{ModificationEngine, availability, projector};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

pub fn router(state: AppState) -> Router {
    let timetable = Router::new()
        .route("/timetable", get(view_timetable))
        .route("/class/{id}", get(class_detail))
        .route("/available-rooms", post(available_rooms))
        .route("/postpone-class", post(postpone_class))
        .route("/cancel-class", post(cancel_class));

    Router::new()
        .route("/health", get(health))
        .nest("/timetable", timetable)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("select 1").execute(&state.db).await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            error!("health check failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn view_timetable(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Json<Vec<TimetableEntry>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let entries = projector::project(&mut conn, &viewer).await?;
    Ok(Json(entries))
}

async fn class_detail(
    State(state): State<AppState>,
    _viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Json<Vec<ClassDetail>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let details = repository::class_detail(&mut conn, &id).await?;
    if details.is_empty() {
        return Err(AppError::NotFound("Class not found".to_string()));
    }
    Ok(Json(details))
}

async fn available_rooms(
    State(state): State<AppState>,
    _viewer: Viewer,
    Json(req): Json<AvailableRoomsRequest>,
) -> Result<Json<Vec<Classroom>>, AppError> {
    let missing = || AppError::Validation("Missing required fields".to_string());
    let date = schedule::parse_date(&req.date.ok_or_else(missing)?)
        .ok_or_else(|| AppError::Validation("Invalid date".to_string()))?;
    let start = schedule::parse_time(&req.start_time.ok_or_else(missing)?)
        .ok_or_else(|| AppError::Validation("Invalid startTime".to_string()))?;
    let end = schedule::parse_time(&req.end_time.ok_or_else(missing)?)
        .ok_or_else(|| AppError::Validation("Invalid endTime".to_string()))?;
    if start >= end {
        return Err(AppError::Validation(
            "startTime must be before endTime".to_string(),
        ));
    }

    let mut conn = state.db.acquire().await?;
    let rooms = availability::available_rooms(&mut conn, date, start, end).await?;
    Ok(Json(rooms))
}

async fn postpone_class(
    State(state): State<AppState>,
    _viewer: Viewer,
    Json(req): Json<PostponeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let engine = ModificationEngine::new(state.db.clone());
    engine.postpone(req).await?;
    Ok(message("Class successfully postponed"))
}

async fn cancel_class(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(req): Json<CancelRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    viewer.require_professor()?;
    let engine = ModificationEngine::new(state.db.clone());
    engine.cancel(req).await?;
    Ok(message("Class cancelled successfully"))
}
