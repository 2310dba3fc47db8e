pub mod activity;
pub mod application;
pub mod condition;
pub mod release;
pub mod update_check;

use releasegate_core::error::CoreError;
use releasegate_core::types::DbId;
use releasegate_db::models::application::Application;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load an application or fail with 404.
pub(crate) async fn require_application(
    state: &AppState,
    application_id: DbId,
) -> AppResult<Application> {
    state
        .catalog
        .get_application(application_id)
        .await?
        .ok_or(AppError::not_found("Application", application_id))
}

/// Every id must name a condition owned by the same application.
pub(crate) async fn ensure_conditions_exist(
    state: &AppState,
    application_id: DbId,
    condition_ids: &[DbId],
) -> AppResult<()> {
    if condition_ids.is_empty() {
        return Ok(());
    }
    let known = state.catalog.list_conditions(application_id).await?;
    match condition_ids
        .iter()
        .find(|id| !known.iter().any(|c| c.id == **id))
    {
        Some(missing) => Err(AppError::Core(CoreError::Validation(format!(
            "condition {missing} does not exist in application {application_id}"
        )))),
        None => Ok(()),
    }
}
