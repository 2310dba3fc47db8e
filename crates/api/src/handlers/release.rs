//! Handlers for `/applications/{app_id}/releases`, including the two
//! administrative evaluation endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use releasegate_core::release::{Release, ReleaseStatus};
use releasegate_core::types::DbId;
use releasegate_db::models::release::{CreateRelease, UpdateRelease};
use serde::Serialize;

use super::{ensure_conditions_exist, require_application};
use crate::context::ContextBody;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::query::ReleaseListParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub release_id: DbId,
    pub available: bool,
}

/// POST /api/v1/applications/{app_id}/releases
pub async fn create(
    State(state): State<AppState>,
    Path(app_id): Path<DbId>,
    AppJson(input): AppJson<CreateRelease>,
) -> AppResult<(StatusCode, Json<DataResponse<Release>>)> {
    let input = input.validated()?;
    require_application(&state, app_id).await?;
    ensure_conditions_exist(&state, app_id, &input.condition_ids).await?;

    let release = state.catalog.create_release(app_id, &input).await?;
    tracing::info!(
        application_id = app_id,
        release_id = release.id,
        version_code = %release.version_code,
        "Release created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: release })))
}

/// GET /api/v1/applications/{app_id}/releases?status=
pub async fn list_by_application(
    State(state): State<AppState>,
    Path(app_id): Path<DbId>,
    Query(params): Query<ReleaseListParams>,
) -> AppResult<Json<DataResponse<Vec<Release>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ReleaseStatus>)
        .transpose()?;
    require_application(&state, app_id).await?;
    let releases = state.catalog.list_releases(app_id, status).await?;
    Ok(Json(DataResponse { data: releases }))
}

/// GET /api/v1/applications/{app_id}/releases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Release>>> {
    let release = state
        .catalog
        .get_release(app_id, id)
        .await?
        .ok_or(AppError::not_found("Release", id))?;
    Ok(Json(DataResponse { data: release }))
}

/// PUT /api/v1/applications/{app_id}/releases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateRelease>,
) -> AppResult<Json<DataResponse<Release>>> {
    let input = input.validated()?;
    if let Some(condition_ids) = &input.condition_ids {
        ensure_conditions_exist(&state, app_id, condition_ids).await?;
    }
    let release = state
        .catalog
        .update_release(app_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Release", id))?;
    tracing::info!(
        application_id = app_id,
        release_id = id,
        status = %release.status,
        "Release updated"
    );
    Ok(Json(DataResponse { data: release }))
}

/// DELETE /api/v1/applications/{app_id}/releases/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if state.catalog.delete_release(app_id, id).await? {
        tracing::info!(application_id = app_id, release_id = id, "Release deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Release", id))
    }
}

/// POST /api/v1/applications/{app_id}/releases/latest
///
/// `data` is `null` when nothing qualifies.
pub async fn latest(
    State(state): State<AppState>,
    Path(app_id): Path<DbId>,
    AppJson(body): AppJson<ContextBody>,
) -> AppResult<Json<DataResponse<Option<Release>>>> {
    let context = body.into_context()?;
    require_application(&state, app_id).await?;
    let release = state.selector().select_latest(app_id, &context).await?;
    Ok(Json(DataResponse { data: release }))
}

/// POST /api/v1/applications/{app_id}/releases/{id}/availability
pub async fn availability(
    State(state): State<AppState>,
    Path((app_id, id)): Path<(DbId, DbId)>,
    AppJson(body): AppJson<ContextBody>,
) -> AppResult<Json<DataResponse<AvailabilityResponse>>> {
    let context = body.into_context()?;
    let available = state
        .selector()
        .is_specific_release_available(app_id, id, &context)
        .await?;
    Ok(Json(DataResponse {
        data: AvailabilityResponse {
            release_id: id,
            available,
        },
    }))
}
