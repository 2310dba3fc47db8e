//! Release selection: the single best release for a context.
//!
//! Candidates are the application's active releases ordered by numeric
//! version code descending. Duplicate codes fall back to creation time
//! descending, then id descending, so the scan order never depends on the
//! storage backend. The first candidate the [`RuleCombinator`] accepts wins.

use std::cmp::Reverse;

use crate::combinator::{MatchMode, RuleCombinator};
use crate::condition::Condition;
use crate::error::CoreError;
use crate::release::Release;
use crate::rules::EvaluationContext;
use crate::storage::ReleaseStore;
use crate::types::DbId;
use crate::update_check::{ReportedVersion, UpdateCheck};

/// Stateless selector over a storage collaborator.
///
/// Cheap to construct per request; it borrows the store and holds no other
/// state.
pub struct ReleaseSelector<'a, S: ReleaseStore + ?Sized> {
    store: &'a S,
    combinator: RuleCombinator,
}

impl<'a, S: ReleaseStore + ?Sized> ReleaseSelector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            combinator: RuleCombinator::default(),
        }
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.combinator = RuleCombinator::new(mode);
        self
    }

    /// The highest-versioned active release the context qualifies for.
    ///
    /// `Ok(None)` means nothing qualifies, which is not an error.
    pub async fn select_latest(
        &self,
        application_id: DbId,
        context: &EvaluationContext,
    ) -> Result<Option<Release>, CoreError> {
        let releases = self.store.list_active_releases(application_id).await?;
        let conditions = self.store.list_conditions(application_id).await?;

        let selected = pick_latest(&self.combinator, releases, context, &conditions);
        tracing::debug!(
            application_id,
            release_id = selected.as_ref().map(|r| r.id),
            "Release selection finished"
        );
        Ok(selected)
    }

    /// Whether one named release is available to the context.
    ///
    /// Fails with [`CoreError::NotFound`] if the release does not exist in
    /// the application or is not active.
    pub async fn is_specific_release_available(
        &self,
        application_id: DbId,
        release_id: DbId,
        context: &EvaluationContext,
    ) -> Result<bool, CoreError> {
        let release = self
            .store
            .get_release(application_id, release_id)
            .await?
            .filter(Release::is_active)
            .ok_or(CoreError::NotFound {
                entity: "Release",
                id: release_id,
            })?;
        let conditions = self.store.list_conditions(application_id).await?;

        Ok(self.combinator.is_available(&release, context, &conditions))
    }

    /// Compare the caller's reported version with the latest release it
    /// qualifies for.
    pub async fn check_update(
        &self,
        application_id: DbId,
        current: ReportedVersion,
        context: &EvaluationContext,
    ) -> Result<UpdateCheck, CoreError> {
        let latest = self.select_latest(application_id, context).await?;
        Ok(UpdateCheck::decide(current, latest.as_ref()))
    }
}

/// Order active releases for scanning.
///
/// Releases that are not active, or whose stored version code is not a
/// non-negative integer, are left out.
pub fn order_candidates(releases: Vec<Release>) -> Vec<Release> {
    let mut keyed: Vec<(u64, Release)> = releases
        .into_iter()
        .filter(Release::is_active)
        .filter_map(|release| match release.version_number() {
            Some(code) => Some((code, release)),
            None => {
                tracing::warn!(
                    release_id = release.id,
                    version_code = %release.version_code,
                    "Skipping release with non-numeric version code"
                );
                None
            }
        })
        .collect();

    keyed.sort_by_key(|(code, release)| {
        (
            Reverse(*code),
            Reverse(release.created_at),
            Reverse(release.id),
        )
    });
    keyed.into_iter().map(|(_, release)| release).collect()
}

/// First release in scan order that `combinator` accepts for `context`.
pub fn pick_latest(
    combinator: &RuleCombinator,
    releases: Vec<Release>,
    context: &EvaluationContext,
    conditions: &[Condition],
) -> Option<Release> {
    order_candidates(releases)
        .into_iter()
        .find(|release| combinator.is_available(release, context, conditions))
}
