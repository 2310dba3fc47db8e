//! Versioned release records and their lifecycle status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Status ID type matching SMALLINT in the `release_statuses` lookup table.
pub type StatusId = i16;

/// Release lifecycle status.
///
/// Discriminants match the seed order of the `release_statuses` table.
/// Transitions are free-form: any status may change to any other.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Active = 1,
    Paused = 2,
    Deprecated = 3,
    Archived = 4,
}

impl ReleaseStatus {
    pub const ALL: [ReleaseStatus; 4] = [
        ReleaseStatus::Active,
        ReleaseStatus::Paused,
        ReleaseStatus::Deprecated,
        ReleaseStatus::Archived,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Look up a status by its database ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseStatus::Active => "active",
            ReleaseStatus::Paused => "paused",
            ReleaseStatus::Deprecated => "deprecated",
            ReleaseStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown release status: '{s}'. Valid statuses: active, paused, deprecated, archived"
                ))
            })
    }
}

/// A versioned artifact offered to clients of one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: DbId,
    pub application_id: DbId,
    pub version_name: String,
    /// Numeric version code kept in its stored string form.
    pub version_code: String,
    pub status: ReleaseStatus,
    /// Attached conditions. Order carries no meaning for evaluation.
    pub condition_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

impl Release {
    /// The version code as an integer, or `None` if the stored value is not
    /// a non-negative integer.
    pub fn version_number(&self) -> Option<u64> {
        parse_version_code(&self.version_code).ok()
    }

    pub fn is_active(&self) -> bool {
        self.status == ReleaseStatus::Active
    }
}

/// Parse a version code as a non-negative integer.
///
/// Surrounding whitespace is ignored. Signs, decimals and anything
/// non-numeric are rejected.
pub fn parse_version_code(raw: &str) -> Result<u64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "version_code must be a non-negative integer, got '{raw}'"
        )));
    }
    trimmed.parse::<u64>().map_err(|_| {
        CoreError::Validation(format!("version_code is out of range: '{raw}'"))
    })
}

/// Drop repeated ids while keeping first-seen order.
pub fn dedup_condition_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_ids_round_trip_through_lookup() {
        for status in ReleaseStatus::ALL {
            assert_eq!(ReleaseStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ReleaseStatus::from_id(0), None);
        assert_eq!(ReleaseStatus::Active.id(), 1);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ACTIVE".parse::<ReleaseStatus>().unwrap(), ReleaseStatus::Active);
        assert_eq!(" paused ".parse::<ReleaseStatus>().unwrap(), ReleaseStatus::Paused);
        assert_matches!("live".parse::<ReleaseStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReleaseStatus::Deprecated).unwrap(),
            "\"deprecated\""
        );
    }

    #[test]
    fn version_codes_parse_numerically() {
        assert_eq!(parse_version_code("20").unwrap(), 20);
        assert_eq!(parse_version_code(" 007 ").unwrap(), 7);
        assert_eq!(parse_version_code("0").unwrap(), 0);
    }

    #[test]
    fn malformed_version_codes_are_rejected() {
        for raw in ["", "-1", "+5", "1.2", "abc", "99999999999999999999999"] {
            assert_matches!(parse_version_code(raw), Err(CoreError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup_condition_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
