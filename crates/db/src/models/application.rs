//! Application entity model and DTOs.

use releasegate_core::error::CoreError;
use releasegate_core::types::{DbId, Timestamp};
use releasegate_core::validation::validate_non_empty;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `applications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Application {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new application.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub name: String,
    pub description: Option<String>,
}

impl CreateApplication {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: validate_non_empty("name", &self.name)?,
            description: clean_description(self.description),
        })
    }
}

/// DTO for updating an application. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplication {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateApplication {
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: self
                .name
                .map(|n| validate_non_empty("name", &n))
                .transpose()?,
            description: clean_description(self.description),
        })
    }
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
