//! Repository for the `conditions` table.

use releasegate_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::condition::ConditionRow;

const COLUMNS: &str = "id, application_id, name, rules, created_at, updated_at";

/// Provides CRUD operations for conditions, always scoped to one application.
pub struct ConditionRepo;

impl ConditionRepo {
    /// Insert a condition. `rules` must already be in the stored shape.
    pub async fn create(
        pool: &PgPool,
        application_id: DbId,
        name: &str,
        rules: &Value,
    ) -> Result<ConditionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO conditions (application_id, name, rules)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConditionRow>(&query)
            .bind(application_id)
            .bind(name)
            .bind(rules)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        application_id: DbId,
        id: DbId,
    ) -> Result<Option<ConditionRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM conditions WHERE id = $1 AND application_id = $2");
        sqlx::query_as::<_, ConditionRow>(&query)
            .bind(id)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<ConditionRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM conditions WHERE application_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, ConditionRow>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }

    /// Update a condition's name and/or rules.
    ///
    /// Returns `None` if the condition does not exist in this application.
    pub async fn update(
        pool: &PgPool,
        application_id: DbId,
        id: DbId,
        name: Option<&str>,
        rules: Option<&Value>,
    ) -> Result<Option<ConditionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE conditions SET
                name = COALESCE($3, name),
                rules = COALESCE($4, rules)
             WHERE id = $1 AND application_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConditionRow>(&query)
            .bind(id)
            .bind(application_id)
            .bind(name)
            .bind(rules)
            .fetch_optional(pool)
            .await
    }

    /// Delete a condition. Attachments in `release_conditions` go with it.
    pub async fn delete(pool: &PgPool, application_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM conditions WHERE id = $1 AND application_id = $2")
            .bind(id)
            .bind(application_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
