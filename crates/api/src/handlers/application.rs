//! Handlers for the `/applications` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use releasegate_core::types::DbId;
use releasegate_db::models::application::{Application, CreateApplication, UpdateApplication};

use super::require_application;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/applications
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateApplication>,
) -> AppResult<(StatusCode, Json<DataResponse<Application>>)> {
    let input = input.validated()?;
    let application = state.catalog.create_application(&input).await?;
    tracing::info!(application_id = application.id, "Application created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    let applications = state.catalog.list_applications().await?;
    Ok(Json(DataResponse { data: applications }))
}

/// GET /api/v1/applications/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Application>>> {
    let application = require_application(&state, id).await?;
    Ok(Json(DataResponse { data: application }))
}

/// PUT /api/v1/applications/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateApplication>,
) -> AppResult<Json<DataResponse<Application>>> {
    let input = input.validated()?;
    let application = state
        .catalog
        .update_application(id, &input)
        .await?
        .ok_or(AppError::not_found("Application", id))?;
    Ok(Json(DataResponse { data: application }))
}

/// DELETE /api/v1/applications/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.catalog.delete_application(id).await? {
        tracing::info!(application_id = id, "Application deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Application", id))
    }
}
