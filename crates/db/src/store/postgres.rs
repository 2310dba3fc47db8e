//! [`Catalog`] backed by PostgreSQL through the zero-sized repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use releasegate_core::activity::{ActivityRecord, ActivitySink};
use releasegate_core::condition::Condition;
use releasegate_core::error::CoreError;
use releasegate_core::release::{Release, ReleaseStatus};
use releasegate_core::storage::ReleaseStore;
use releasegate_core::types::DbId;

use super::Catalog;
use crate::models::activity_log::ActivityLog;
use crate::models::application::{Application, CreateApplication, UpdateApplication};
use crate::models::condition::{CreateCondition, UpdateCondition};
use crate::models::release::{CreateRelease, ReleaseRow, UpdateRelease};
use crate::repositories::{ActivityLogRepo, ApplicationRepo, ConditionRepo, ReleaseRepo};
use crate::rules::rules_to_json;
use crate::DbPool;

/// Map a database error onto the domain taxonomy.
///
/// Constraint violations become client errors; everything else is logged and
/// surfaces as [`CoreError::Storage`].
pub fn storage_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => return CoreError::Conflict(db_err.message().to_string()),
            // foreign_key_violation, check_violation
            Some("23503") | Some("23514") => {
                return CoreError::Validation(db_err.message().to_string())
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Storage operation failed");
    CoreError::Storage(err.to_string())
}

#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Load condition attachments for `rows` with a single query.
    async fn attach_conditions(&self, rows: Vec<ReleaseRow>) -> Result<Vec<Release>, CoreError> {
        let ids: Vec<DbId> = rows.iter().map(|row| row.id).collect();
        let pairs = ReleaseRepo::condition_ids_for_many(&self.pool, &ids)
            .await
            .map_err(storage_error)?;

        let mut by_release: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (release_id, condition_id) in pairs {
            by_release.entry(release_id).or_default().push(condition_id);
        }

        rows.into_iter()
            .map(|row| {
                let condition_ids = by_release.remove(&row.id).unwrap_or_default();
                row.into_release(condition_ids)
            })
            .collect()
    }

    async fn attach_one(&self, row: Option<ReleaseRow>) -> Result<Option<Release>, CoreError> {
        match row {
            Some(row) => Ok(self.attach_conditions(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ReleaseStore for PgCatalog {
    async fn list_active_releases(&self, application_id: DbId) -> Result<Vec<Release>, CoreError> {
        let rows = ReleaseRepo::list(&self.pool, application_id, Some(ReleaseStatus::Active))
            .await
            .map_err(storage_error)?;
        self.attach_conditions(rows).await
    }

    async fn get_release(
        &self,
        application_id: DbId,
        release_id: DbId,
    ) -> Result<Option<Release>, CoreError> {
        let row = ReleaseRepo::find_by_id(&self.pool, application_id, release_id)
            .await
            .map_err(storage_error)?;
        self.attach_one(row).await
    }

    async fn list_conditions(&self, application_id: DbId) -> Result<Vec<Condition>, CoreError> {
        let rows = ConditionRepo::list_by_application(&self.pool, application_id)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(|row| row.into_condition()).collect())
    }

    async fn get_condition(
        &self,
        application_id: DbId,
        condition_id: DbId,
    ) -> Result<Option<Condition>, CoreError> {
        let row = ConditionRepo::find_by_id(&self.pool, application_id, condition_id)
            .await
            .map_err(storage_error)?;
        Ok(row.map(|row| row.into_condition()))
    }
}

#[async_trait]
impl ActivitySink for PgCatalog {
    async fn record(&self, record: &ActivityRecord) -> Result<(), CoreError> {
        ActivityLogRepo::insert(&self.pool, record)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn health_check(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }

    async fn list_applications(&self) -> Result<Vec<Application>, CoreError> {
        ApplicationRepo::list(&self.pool).await.map_err(storage_error)
    }

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError> {
        ApplicationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage_error)
    }

    async fn create_application(
        &self,
        input: &CreateApplication,
    ) -> Result<Application, CoreError> {
        ApplicationRepo::create(&self.pool, input)
            .await
            .map_err(storage_error)
    }

    async fn update_application(
        &self,
        id: DbId,
        input: &UpdateApplication,
    ) -> Result<Option<Application>, CoreError> {
        ApplicationRepo::update(&self.pool, id, input)
            .await
            .map_err(storage_error)
    }

    async fn delete_application(&self, id: DbId) -> Result<bool, CoreError> {
        ApplicationRepo::delete(&self.pool, id)
            .await
            .map_err(storage_error)
    }

    async fn create_condition(
        &self,
        application_id: DbId,
        input: &CreateCondition,
    ) -> Result<Condition, CoreError> {
        let row = ConditionRepo::create(
            &self.pool,
            application_id,
            &input.name,
            &rules_to_json(&input.rules),
        )
        .await
        .map_err(storage_error)?;
        Ok(row.into_condition())
    }

    async fn update_condition(
        &self,
        application_id: DbId,
        id: DbId,
        input: &UpdateCondition,
    ) -> Result<Option<Condition>, CoreError> {
        let rules = input.rules.as_ref().map(rules_to_json);
        let row = ConditionRepo::update(
            &self.pool,
            application_id,
            id,
            input.name.as_deref(),
            rules.as_ref(),
        )
        .await
        .map_err(storage_error)?;
        Ok(row.map(|row| row.into_condition()))
    }

    async fn delete_condition(&self, application_id: DbId, id: DbId) -> Result<bool, CoreError> {
        ConditionRepo::delete(&self.pool, application_id, id)
            .await
            .map_err(storage_error)
    }

    async fn list_releases(
        &self,
        application_id: DbId,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<Release>, CoreError> {
        let rows = ReleaseRepo::list(&self.pool, application_id, status)
            .await
            .map_err(storage_error)?;
        self.attach_conditions(rows).await
    }

    async fn create_release(
        &self,
        application_id: DbId,
        input: &CreateRelease,
    ) -> Result<Release, CoreError> {
        let row = ReleaseRepo::create(&self.pool, application_id, input)
            .await
            .map_err(storage_error)?;
        row.into_release(input.condition_ids.clone())
    }

    async fn update_release(
        &self,
        application_id: DbId,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<Release>, CoreError> {
        let row = ReleaseRepo::update(&self.pool, application_id, id, input)
            .await
            .map_err(storage_error)?;
        self.attach_one(row).await
    }

    async fn delete_release(&self, application_id: DbId, id: DbId) -> Result<bool, CoreError> {
        ReleaseRepo::delete(&self.pool, application_id, id)
            .await
            .map_err(storage_error)
    }

    async fn list_activity(
        &self,
        application_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, CoreError> {
        ActivityLogRepo::list(&self.pool, application_id, limit, offset)
            .await
            .map_err(storage_error)
    }
}
