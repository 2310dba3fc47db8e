//! Repository for the `activity_logs` table.

use releasegate_core::activity::ActivityRecord;
use releasegate_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity_log::ActivityLog;

const COLUMNS: &str = "id, application_id, event_type, payload, created_at";

pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append one activity record, keeping its original timestamp.
    pub async fn insert(pool: &PgPool, record: &ActivityRecord) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (application_id, event_type, payload, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(record.application_id)
            .bind(&record.event_type)
            .bind(&record.payload)
            .bind(record.occurred_at)
            .fetch_one(pool)
            .await
    }

    /// Newest entries first, optionally restricted to one application.
    pub async fn list(
        pool: &PgPool,
        application_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE ($1::bigint IS NULL OR application_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(application_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
