//! Handler for the public update check consumed by client devices.

use axum::extract::State;
use axum::Json;
use releasegate_core::activity::{ActivityRecord, UPDATE_CHECK};
use releasegate_core::update_check::{LatestVersion, ReportedVersion, UpdateCheck};
use serde::Serialize;
use serde_json::json;

use super::require_application;
use crate::context::CheckUpdateRequest;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckResponse {
    pub update_required: bool,
    pub current_version: ReportedVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<LatestVersion>,
    pub message: &'static str,
}

impl From<&UpdateCheck> for UpdateCheckResponse {
    fn from(outcome: &UpdateCheck) -> Self {
        Self {
            update_required: outcome.update_required(),
            current_version: outcome.current().clone(),
            latest_version: outcome.latest().cloned(),
            message: outcome.message(),
        }
    }
}

/// POST /api/v1/updates/check
///
/// Malformed JSON is a 400 `BAD_REQUEST`; field problems are a 400
/// `VALIDATION_ERROR` listing every offending field.
pub async fn check(
    State(state): State<AppState>,
    AppJson(request): AppJson<CheckUpdateRequest>,
) -> AppResult<Json<DataResponse<UpdateCheckResponse>>> {
    let input = request.into_input()?;
    let app_id = input.application_id;

    require_application(&state, app_id).await?;

    let outcome = state
        .selector()
        .check_update(app_id, input.current.clone(), &input.context)
        .await?;

    tracing::debug!(
        application_id = app_id,
        reported_code = input.current.version_code,
        latest_release_id = outcome.latest().map(|l| l.id),
        outcome = outcome.outcome(),
        "Update check evaluated"
    );

    state.event_bus.publish(
        ActivityRecord::new(UPDATE_CHECK)
            .with_application(app_id)
            .with_payload(json!({
                "context": input.context,
                "currentVersion": input.current,
                "references": input.references,
                "outcome": outcome.outcome(),
                "latestReleaseId": outcome.latest().map(|l| l.id)
            })),
    );

    Ok(Json(DataResponse {
        data: UpdateCheckResponse::from(&outcome),
    }))
}
