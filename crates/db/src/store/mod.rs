//! The storage boundary used by the API.
//!
//! [`Catalog`] extends the read-only [`ReleaseStore`] that the evaluation
//! engine needs with administrative writes and activity recording. Two
//! backends exist: [`postgres::PgCatalog`] and [`memory::MemoryCatalog`].

use async_trait::async_trait;
use releasegate_core::activity::ActivitySink;
use releasegate_core::condition::Condition;
use releasegate_core::error::CoreError;
use releasegate_core::release::{Release, ReleaseStatus};
use releasegate_core::storage::ReleaseStore;
use releasegate_core::types::DbId;

use crate::models::activity_log::ActivityLog;
use crate::models::application::{Application, CreateApplication, UpdateApplication};
use crate::models::condition::{CreateCondition, UpdateCondition};
use crate::models::release::{CreateRelease, UpdateRelease};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

/// Full read/write access to applications, conditions, releases and the
/// activity log.
///
/// Inputs are expected to have passed their `validated()` step already.
/// Condition and release methods are scoped to `application_id`; an id that
/// exists under a different application behaves as if it did not exist.
#[async_trait]
pub trait Catalog: ReleaseStore + ActivitySink {
    /// Whether the backing store is reachable.
    async fn health_check(&self) -> bool;

    async fn list_applications(&self) -> Result<Vec<Application>, CoreError>;

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError>;

    async fn create_application(&self, input: &CreateApplication)
        -> Result<Application, CoreError>;

    async fn update_application(
        &self,
        id: DbId,
        input: &UpdateApplication,
    ) -> Result<Option<Application>, CoreError>;

    /// Removes the application together with its conditions and releases.
    async fn delete_application(&self, id: DbId) -> Result<bool, CoreError>;

    async fn create_condition(
        &self,
        application_id: DbId,
        input: &CreateCondition,
    ) -> Result<Condition, CoreError>;

    async fn update_condition(
        &self,
        application_id: DbId,
        id: DbId,
        input: &UpdateCondition,
    ) -> Result<Option<Condition>, CoreError>;

    /// Removes the condition and detaches it from every release.
    async fn delete_condition(&self, application_id: DbId, id: DbId) -> Result<bool, CoreError>;

    /// Releases of any status, newest first.
    async fn list_releases(
        &self,
        application_id: DbId,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<Release>, CoreError>;

    async fn create_release(
        &self,
        application_id: DbId,
        input: &CreateRelease,
    ) -> Result<Release, CoreError>;

    async fn update_release(
        &self,
        application_id: DbId,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<Release>, CoreError>;

    async fn delete_release(&self, application_id: DbId, id: DbId) -> Result<bool, CoreError>;

    /// Activity entries, newest first.
    async fn list_activity(
        &self,
        application_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, CoreError>;
}
