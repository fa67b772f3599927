use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{CreateJob, JobFilter, UpdateJob};
use crate::services::job_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_job).get(list_jobs))
        .route("/:id", get(get_job).patch(update_job).delete(delete_job))
}

pub async fn create_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateJob>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    info!("POST /jobs - Creating job (by {})", admin.username);
    let job = job_service::create(&state.pool, input)
        .await
        .map_err(|e| {
            error!("Failed to create job: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<JobFilter>,
) -> Result<Json<Value>, AppError> {
    info!("GET /jobs - Listing jobs with {:?}", filter);
    let jobs = job_service::find_all(&state.pool, &filter)
        .await
        .map_err(|e| {
            error!("Failed to list jobs: {}", e);
            e
        })?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, AppError> {
    info!("GET /jobs/{} - Fetching job", id);
    let job = job_service::get(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to fetch job {}: {}", id, e);
            e
        })?;
    Ok(Json(json!({ "job": job })))
}

pub async fn update_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateJob>,
) -> Result<Json<Value>, AppError> {
    info!("PATCH /jobs/{} - Updating job (by {})", id, admin.username);
    let job = job_service::update(&state.pool, id, input)
        .await
        .map_err(|e| {
            error!("Failed to update job {}: {}", id, e);
            e
        })?;
    Ok(Json(json!({ "job": job })))
}

pub async fn delete_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, AppError> {
    info!("DELETE /jobs/{} - Deleting job (by {})", id, admin.username);
    job_service::remove(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete job {}: {}", id, e);
            e
        })?;
    Ok(Json(json!({ "deleted": id })))
}
