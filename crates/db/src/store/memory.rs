//! In-process [`Catalog`] used for local development and tests.
//!
//! State lives behind a single `tokio::sync::RwLock`. Deletes cascade the
//! same way the Postgres foreign keys do.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use releasegate_core::activity::{ActivityRecord, ActivitySink};
use releasegate_core::condition::Condition;
use releasegate_core::error::CoreError;
use releasegate_core::release::{Release, ReleaseStatus};
use releasegate_core::storage::ReleaseStore;
use releasegate_core::types::DbId;
use tokio::sync::RwLock;

use super::Catalog;
use crate::models::activity_log::ActivityLog;
use crate::models::application::{Application, CreateApplication, UpdateApplication};
use crate::models::condition::{CreateCondition, UpdateCondition};
use crate::models::release::{CreateRelease, UpdateRelease};

/// Activity entries kept before the oldest are dropped.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 10_000;

#[derive(Default)]
struct MemoryState {
    next_id: DbId,
    applications: BTreeMap<DbId, Application>,
    conditions: BTreeMap<DbId, Condition>,
    releases: BTreeMap<DbId, Release>,
    activity: VecDeque<ActivityLog>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn condition_in(&self, application_id: DbId, id: DbId) -> Option<&Condition> {
        self.conditions
            .get(&id)
            .filter(|c| c.application_id == application_id)
    }

    fn release_in_mut(&mut self, application_id: DbId, id: DbId) -> Option<&mut Release> {
        self.releases
            .get_mut(&id)
            .filter(|r| r.application_id == application_id)
    }

    fn require_application(&self, application_id: DbId) -> Result<(), CoreError> {
        if self.applications.contains_key(&application_id) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Application",
                id: application_id,
            })
        }
    }

    /// Mirrors the junction-table foreign key: every id must name an
    /// existing condition of the same application.
    fn check_condition_ids(&self, application_id: DbId, ids: &[DbId]) -> Result<(), CoreError> {
        match ids
            .iter()
            .find(|id| self.condition_in(application_id, **id).is_none())
        {
            Some(missing) => Err(CoreError::Validation(format!(
                "condition {missing} does not exist in application {application_id}"
            ))),
            None => Ok(()),
        }
    }
}

pub struct MemoryCatalog {
    state: RwLock<MemoryState>,
    activity_capacity: usize,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::with_activity_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }

    pub fn with_activity_capacity(activity_capacity: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            activity_capacity: activity_capacity.max(1),
        }
    }
}

fn newest_first(releases: &mut [Release]) {
    releases.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl ReleaseStore for MemoryCatalog {
    async fn list_active_releases(&self, application_id: DbId) -> Result<Vec<Release>, CoreError> {
        let state = self.state.read().await;
        let mut releases: Vec<Release> = state
            .releases
            .values()
            .filter(|r| r.application_id == application_id && r.is_active())
            .cloned()
            .collect();
        newest_first(&mut releases);
        Ok(releases)
    }

    async fn get_release(
        &self,
        application_id: DbId,
        release_id: DbId,
    ) -> Result<Option<Release>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .releases
            .get(&release_id)
            .filter(|r| r.application_id == application_id)
            .cloned())
    }

    async fn list_conditions(&self, application_id: DbId) -> Result<Vec<Condition>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .conditions
            .values()
            .filter(|c| c.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn get_condition(
        &self,
        application_id: DbId,
        condition_id: DbId,
    ) -> Result<Option<Condition>, CoreError> {
        let state = self.state.read().await;
        Ok(state.condition_in(application_id, condition_id).cloned())
    }
}

#[async_trait]
impl ActivitySink for MemoryCatalog {
    async fn record(&self, record: &ActivityRecord) -> Result<(), CoreError> {
        let mut state = self.state.write().await;
        let id = state.allocate_id();
        if state.activity.len() >= self.activity_capacity {
            state.activity.pop_front();
        }
        state.activity.push_back(ActivityLog {
            id,
            application_id: record.application_id,
            event_type: record.event_type.clone(),
            payload: record.payload.clone(),
            created_at: record.occurred_at,
        });
        Ok(())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn health_check(&self) -> bool {
        true
    }

    async fn list_applications(&self) -> Result<Vec<Application>, CoreError> {
        Ok(self.state.read().await.applications.values().cloned().collect())
    }

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError> {
        Ok(self.state.read().await.applications.get(&id).cloned())
    }

    async fn create_application(
        &self,
        input: &CreateApplication,
    ) -> Result<Application, CoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let application = Application {
            id: state.allocate_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn update_application(
        &self,
        id: DbId,
        input: &UpdateApplication,
    ) -> Result<Option<Application>, CoreError> {
        let mut state = self.state.write().await;
        let Some(application) = state.applications.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            application.name = name.clone();
        }
        if let Some(description) = &input.description {
            application.description = Some(description.clone());
        }
        application.updated_at = Utc::now();
        Ok(Some(application.clone()))
    }

    async fn delete_application(&self, id: DbId) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        if state.applications.remove(&id).is_none() {
            return Ok(false);
        }
        state.conditions.retain(|_, c| c.application_id != id);
        state.releases.retain(|_, r| r.application_id != id);
        for entry in state.activity.iter_mut() {
            if entry.application_id == Some(id) {
                entry.application_id = None;
            }
        }
        Ok(true)
    }

    async fn create_condition(
        &self,
        application_id: DbId,
        input: &CreateCondition,
    ) -> Result<Condition, CoreError> {
        let mut state = self.state.write().await;
        state.require_application(application_id)?;
        let condition = Condition {
            id: state.allocate_id(),
            application_id,
            name: input.name.clone(),
            rules: input.rules.clone(),
            created_at: Utc::now(),
        };
        state.conditions.insert(condition.id, condition.clone());
        Ok(condition)
    }

    async fn update_condition(
        &self,
        application_id: DbId,
        id: DbId,
        input: &UpdateCondition,
    ) -> Result<Option<Condition>, CoreError> {
        let mut state = self.state.write().await;
        let Some(condition) = state
            .conditions
            .get_mut(&id)
            .filter(|c| c.application_id == application_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            condition.name = name.clone();
        }
        if let Some(rules) = &input.rules {
            condition.rules = rules.clone();
        }
        Ok(Some(condition.clone()))
    }

    async fn delete_condition(&self, application_id: DbId, id: DbId) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        if state.condition_in(application_id, id).is_none() {
            return Ok(false);
        }
        state.conditions.remove(&id);
        for release in state.releases.values_mut() {
            release.condition_ids.retain(|cid| *cid != id);
        }
        Ok(true)
    }

    async fn list_releases(
        &self,
        application_id: DbId,
        status: Option<ReleaseStatus>,
    ) -> Result<Vec<Release>, CoreError> {
        let state = self.state.read().await;
        let mut releases: Vec<Release> = state
            .releases
            .values()
            .filter(|r| r.application_id == application_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        newest_first(&mut releases);
        Ok(releases)
    }

    async fn create_release(
        &self,
        application_id: DbId,
        input: &CreateRelease,
    ) -> Result<Release, CoreError> {
        let mut state = self.state.write().await;
        state.require_application(application_id)?;
        state.check_condition_ids(application_id, &input.condition_ids)?;
        let release = Release {
            id: state.allocate_id(),
            application_id,
            version_name: input.version_name.clone(),
            version_code: input.version_code.clone(),
            status: input.status(),
            condition_ids: input.condition_ids.clone(),
            created_at: Utc::now(),
        };
        state.releases.insert(release.id, release.clone());
        Ok(release)
    }

    async fn update_release(
        &self,
        application_id: DbId,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<Release>, CoreError> {
        let mut state = self.state.write().await;
        if let Some(condition_ids) = &input.condition_ids {
            state.check_condition_ids(application_id, condition_ids)?;
        }
        let Some(release) = state.release_in_mut(application_id, id) else {
            return Ok(None);
        };
        if let Some(version_name) = &input.version_name {
            release.version_name = version_name.clone();
        }
        if let Some(version_code) = &input.version_code {
            release.version_code = version_code.clone();
        }
        if let Some(status) = input.status {
            release.status = status;
        }
        if let Some(condition_ids) = &input.condition_ids {
            release.condition_ids = condition_ids.clone();
        }
        Ok(Some(release.clone()))
    }

    async fn delete_release(&self, application_id: DbId, id: DbId) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        if state.release_in_mut(application_id, id).is_none() {
            return Ok(false);
        }
        Ok(state.releases.remove(&id).is_some())
    }

    async fn list_activity(
        &self,
        application_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|entry| application_id.map_or(true, |id| entry.application_id == Some(id)))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
