//! Named, application-scoped rule sets.

use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;
use crate::types::{DbId, Timestamp};

/// A stored targeting rule owned by exactly one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: DbId,
    pub application_id: DbId,
    pub name: String,
    pub rules: RuleSet,
    pub created_at: Timestamp,
}
