use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ApiPath;
use crate::services::application_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:username/jobs/:id", post(apply_to_job))
}

/// Admins may apply on anyone's behalf, other users only for themselves.
pub async fn apply_to_job(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    ApiPath((username, id)): ApiPath<(String, i32)>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if !claims.may_act_for(&username) {
        warn!("{} may not apply on behalf of {}", claims.username, username);
        return Err(AppError::Unauthorized);
    }

    info!("POST /users/{}/jobs/{} - Applying", username, id);
    let applied = application_service::apply(&state.pool, &username, id)
        .await
        .map_err(|e| {
            error!("Failed to apply {} to job {}: {}", username, id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(json!({ "applied": applied }))))
}
