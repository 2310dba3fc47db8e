//! Repository for the `releases` table and its `release_conditions`
//! junction.

use releasegate_core::release::ReleaseStatus;
use releasegate_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::release::{CreateRelease, ReleaseRow, UpdateRelease};

const COLUMNS: &str =
    "id, application_id, version_name, version_code, status_id, created_at, updated_at";

/// Provides CRUD operations for releases and their condition attachments.
pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Insert a release and its condition attachments in one transaction.
    pub async fn create(
        pool: &PgPool,
        application_id: DbId,
        input: &CreateRelease,
    ) -> Result<ReleaseRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO releases (application_id, version_name, version_code, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(application_id)
            .bind(&input.version_name)
            .bind(&input.version_code)
            .bind(input.status().id())
            .fetch_one(&mut *tx)
            .await?;

        Self::set_conditions_inner(&mut *tx, &row, &input.condition_ids).await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        application_id: DbId,
        id: DbId,
    ) -> Result<Option<ReleaseRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1 AND application_id = $2");
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(id)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    /// List an application's releases, newest first, optionally filtered by
    /// status.
    pub async fn list(
        pool: &PgPool,
        application_id: DbId,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<ReleaseRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases
             WHERE application_id = $1 AND ($2::smallint IS NULL OR status_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(application_id)
            .bind(status.map(|s| s.id()))
            .fetch_all(pool)
            .await
    }

    /// Update a release. Only non-`None` fields are applied; `condition_ids`
    /// replaces every attachment when present.
    ///
    /// Returns `None` if the release does not exist in this application.
    pub async fn update(
        pool: &PgPool,
        application_id: DbId,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<ReleaseRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE releases SET
                version_name = COALESCE($3, version_name),
                version_code = COALESCE($4, version_code),
                status_id = COALESCE($5, status_id)
             WHERE id = $1 AND application_id = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(id)
            .bind(application_id)
            .bind(&input.version_name)
            .bind(&input.version_code)
            .bind(input.status.map(|s| s.id()))
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(row), Some(condition_ids)) = (&row, &input.condition_ids) {
            sqlx::query("DELETE FROM release_conditions WHERE release_id = $1")
                .bind(row.id)
                .execute(&mut *tx)
                .await?;
            Self::set_conditions_inner(&mut *tx, row, condition_ids).await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, application_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1 AND application_id = $2")
            .bind(id)
            .bind(application_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(release_id, condition_id)` pairs for the given releases, in
    /// attachment order.
    pub async fn condition_ids_for_many(
        pool: &PgPool,
        release_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        if release_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT release_id, condition_id FROM release_conditions
             WHERE release_id = ANY($1)
             ORDER BY release_id, position",
        )
        .bind(release_ids)
        .fetch_all(pool)
        .await
    }

    /// Attach `condition_ids` in order. A condition of another application
    /// violates `fk_release_conditions_condition`.
    async fn set_conditions_inner(
        conn: &mut PgConnection,
        release: &ReleaseRow,
        condition_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if condition_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO release_conditions (release_id, condition_id, application_id, position)
             SELECT $1, c.id, $3, c.ord::integer
             FROM UNNEST($2::bigint[]) WITH ORDINALITY AS c(id, ord)",
        )
        .bind(release.id)
        .bind(condition_ids)
        .bind(release.application_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}
