//! Condition entity model and DTOs.

use releasegate_core::condition::Condition;
use releasegate_core::error::CoreError;
use releasegate_core::rules::RuleSet;
use releasegate_core::types::{DbId, Timestamp};
use releasegate_core::validation::validate_non_empty;
use serde::Deserialize;
use sqlx::FromRow;

use crate::rules::rules_from_json;

/// A row from the `conditions` table. `rules` is stored JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct ConditionRow {
    pub id: DbId,
    pub application_id: DbId,
    pub name: String,
    pub rules: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConditionRow {
    pub fn into_condition(self) -> Condition {
        Condition {
            id: self.id,
            application_id: self.application_id,
            name: self.name,
            rules: rules_from_json(&self.rules),
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a condition. Omitted rules mean "no restriction".
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCondition {
    pub name: String,
    #[serde(default)]
    pub rules: RuleSet,
}

impl CreateCondition {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: validate_non_empty("name", &self.name)?,
            rules: self.rules.normalized(),
        })
    }
}

/// DTO for updating a condition's name and/or rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCondition {
    pub name: Option<String>,
    /// If `Some`, replaces the whole rule set.
    pub rules: Option<RuleSet>,
}

impl UpdateCondition {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: self
                .name
                .map(|n| validate_non_empty("name", &n))
                .transpose()?,
            rules: self.rules.map(RuleSet::normalized),
        })
    }
}
