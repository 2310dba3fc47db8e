//! Release entity model and DTOs.
//!
//! Condition attachments live in the `release_conditions` junction table and
//! are loaded separately from the release row.

use releasegate_core::error::CoreError;
use releasegate_core::release::{
    dedup_condition_ids, parse_version_code, Release, ReleaseStatus, StatusId,
};
use releasegate_core::types::{DbId, Timestamp};
use releasegate_core::validation::validate_non_empty;
use serde::{Deserialize, Deserializer};
use sqlx::FromRow;

/// A row from the `releases` table.
#[derive(Debug, Clone, FromRow)]
pub struct ReleaseRow {
    pub id: DbId,
    pub application_id: DbId,
    pub version_name: String,
    pub version_code: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReleaseRow {
    pub fn into_release(self, condition_ids: Vec<DbId>) -> Result<Release, CoreError> {
        let status = ReleaseStatus::from_id(self.status_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "release {} has unknown status_id {}",
                self.id, self.status_id
            ))
        })?;
        Ok(Release {
            id: self.id,
            application_id: self.application_id,
            version_name: self.version_name,
            version_code: self.version_code,
            status,
            condition_ids,
            created_at: self.created_at,
        })
    }
}

/// DTO for creating a release.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelease {
    pub version_name: String,
    /// Accepts a JSON string or a non-negative JSON integer.
    #[serde(deserialize_with = "version_code_text")]
    pub version_code: String,
    /// Defaults to `active`.
    pub status: Option<ReleaseStatus>,
    #[serde(default)]
    pub condition_ids: Vec<DbId>,
}

impl CreateRelease {
    /// Trim the version name, canonicalize the version code and collapse
    /// repeated condition ids.
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            version_name: validate_non_empty("version_name", &self.version_name)?,
            version_code: parse_version_code(&self.version_code)?.to_string(),
            status: Some(self.status()),
            condition_ids: dedup_condition_ids(&self.condition_ids),
        })
    }

    pub fn status(&self) -> ReleaseStatus {
        self.status.unwrap_or(ReleaseStatus::Active)
    }
}

/// DTO for updating a release. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRelease {
    pub version_name: Option<String>,
    #[serde(default, deserialize_with = "optional_version_code_text")]
    pub version_code: Option<String>,
    /// Any status may move to any other.
    pub status: Option<ReleaseStatus>,
    /// If `Some`, replaces all condition attachments.
    pub condition_ids: Option<Vec<DbId>>,
}

impl UpdateRelease {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            version_name: self
                .version_name
                .map(|n| validate_non_empty("version_name", &n))
                .transpose()?,
            version_code: self
                .version_code
                .map(|c| parse_version_code(&c).map(|n| n.to_string()))
                .transpose()?,
            status: self.status,
            condition_ids: self.condition_ids.map(|ids| dedup_condition_ids(&ids)),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionCodeInput {
    Number(u64),
    Text(String),
}

impl From<VersionCodeInput> for String {
    fn from(input: VersionCodeInput) -> Self {
        match input {
            VersionCodeInput::Number(n) => n.to_string(),
            VersionCodeInput::Text(s) => s,
        }
    }
}

fn version_code_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    VersionCodeInput::deserialize(deserializer).map(String::from)
}

fn optional_version_code_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<VersionCodeInput>::deserialize(deserializer).map(|v| v.map(String::from))
}
