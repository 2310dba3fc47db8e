//! Activity log entity model.

use releasegate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub application_id: Option<DbId>,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
