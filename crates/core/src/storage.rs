//! The read-only storage seam the evaluation engine depends on.
//!
//! Any persistence technology can back the engine by implementing
//! [`ReleaseStore`]. Implementations are responsible for adapting their
//! stored representation into the canonical domain types; the engine never
//! sees raw rows.

use async_trait::async_trait;

use crate::condition::Condition;
use crate::error::CoreError;
use crate::release::Release;
use crate::types::DbId;

#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Every release of the application whose status is `active`.
    async fn list_active_releases(&self, application_id: DbId) -> Result<Vec<Release>, CoreError>;

    /// A single release of the application, regardless of status.
    async fn get_release(
        &self,
        application_id: DbId,
        release_id: DbId,
    ) -> Result<Option<Release>, CoreError>;

    /// Every condition owned by the application.
    async fn list_conditions(&self, application_id: DbId) -> Result<Vec<Condition>, CoreError>;

    /// A single condition of the application.
    async fn get_condition(
        &self,
        application_id: DbId,
        condition_id: DbId,
    ) -> Result<Option<Condition>, CoreError>;
}
