//! Handlers for `/applications/{app_id}/conditions`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use releasegate_core::condition::Condition;
use releasegate_core::types::DbId;
use releasegate_db::models::condition::{CreateCondition, UpdateCondition};

use super::require_application;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/applications/{app_id}/conditions
pub async fn create(
    State(state): State<AppState>,
    Path(app_id): Path<DbId>,
    AppJson(input): AppJson<CreateCondition>,
) -> AppResult<(StatusCode, Json<DataResponse<Condition>>)> {
    let input = input.validated()?;
    require_application(&state, app_id).await?;
    let condition = state.catalog.create_condition(app_id, &input).await?;
    tracing::info!(application_id = app_id, condition_id = condition.id, "Condition created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: condition })))
}

/// GET /api/v1/applications/{app_id}/conditions
pub async fn list_by_application(
    State(state): State<AppState>,
    Path(app_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Condition>>>> {
    require_application(&state, app_id).await?;
    let conditions = state.catalog.list_conditions(app_id).await?;
    Ok(Json(DataResponse { data: conditions }))
}

/// GET /api/v1/applications/{app_id}/conditions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Condition>>> {
    let condition = state
        .catalog
        .get_condition(app_id, id)
        .await?
        .ok_or(AppError::not_found("Condition", id))?;
    Ok(Json(DataResponse { data: condition }))
}

/// PUT /api/v1/applications/{app_id}/conditions/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateCondition>,
) -> AppResult<Json<DataResponse<Condition>>> {
    let input = input.validated()?;
    let condition = state
        .catalog
        .update_condition(app_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Condition", id))?;
    Ok(Json(DataResponse { data: condition }))
}

/// DELETE /api/v1/applications/{app_id}/conditions/{id}
///
/// Releases that referenced the condition lose the reference.
pub async fn delete(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if state.catalog.delete_condition(app_id, id).await? {
        tracing::info!(application_id = app_id, condition_id = id, "Condition deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Condition", id))
    }
}
