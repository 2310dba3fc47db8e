//! Handler for `GET /activity`.

use axum::extract::{Query, State};
use axum::Json;
use releasegate_db::models::activity_log::ActivityLog;

use crate::error::AppResult;
use crate::query::ActivityParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/activity?app_id=&limit=&offset=
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityLog>>>> {
    let entries = state
        .catalog
        .list_activity(params.app_id, params.limit(), params.offset())
        .await?;
    Ok(Json(DataResponse { data: entries }))
}
