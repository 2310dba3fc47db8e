//! Update-check outcome: compares the caller's reported version with the
//! latest release it qualifies for.

use serde::Serialize;

use crate::release::Release;
use crate::types::DbId;

pub const MESSAGE_UPDATE_AVAILABLE: &str = "A new version is available";
pub const MESSAGE_UP_TO_DATE: &str = "You are using the latest version";
pub const MESSAGE_NO_RELEASES: &str = "No releases are available";

/// The version a client reports it is currently running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedVersion {
    pub version_name: String,
    pub version_code: u64,
}

/// Identity of the release a client should move to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVersion {
    pub id: DbId,
    pub version_name: String,
    pub version_code: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// A qualifying release with a strictly higher version code exists.
    UpdateRequired {
        current: ReportedVersion,
        latest: LatestVersion,
    },
    /// The latest qualifying release is not newer than the reported one.
    UpToDate { current: ReportedVersion },
    /// No release qualifies for the context at all.
    NoEligibleRelease { current: ReportedVersion },
}

impl UpdateCheck {
    /// Compare `current` with the latest qualifying release, if any.
    pub fn decide(current: ReportedVersion, latest: Option<&Release>) -> Self {
        let Some(release) = latest else {
            return UpdateCheck::NoEligibleRelease { current };
        };

        match release.version_number() {
            Some(code) if code > current.version_code => UpdateCheck::UpdateRequired {
                current,
                latest: LatestVersion {
                    id: release.id,
                    version_name: release.version_name.clone(),
                    version_code: code,
                },
            },
            _ => UpdateCheck::UpToDate { current },
        }
    }

    pub fn update_required(&self) -> bool {
        matches!(self, UpdateCheck::UpdateRequired { .. })
    }

    pub fn current(&self) -> &ReportedVersion {
        match self {
            UpdateCheck::UpdateRequired { current, .. }
            | UpdateCheck::UpToDate { current }
            | UpdateCheck::NoEligibleRelease { current } => current,
        }
    }

    pub fn latest(&self) -> Option<&LatestVersion> {
        match self {
            UpdateCheck::UpdateRequired { latest, .. } => Some(latest),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            UpdateCheck::UpdateRequired { .. } => MESSAGE_UPDATE_AVAILABLE,
            UpdateCheck::UpToDate { .. } => MESSAGE_UP_TO_DATE,
            UpdateCheck::NoEligibleRelease { .. } => MESSAGE_NO_RELEASES,
        }
    }

    /// Short machine-readable outcome name, used in activity payloads.
    pub fn outcome(&self) -> &'static str {
        match self {
            UpdateCheck::UpdateRequired { .. } => "update_required",
            UpdateCheck::UpToDate { .. } => "up_to_date",
            UpdateCheck::NoEligibleRelease { .. } => "no_eligible_release",
        }
    }
}
