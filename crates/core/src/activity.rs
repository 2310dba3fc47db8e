//! Activity records emitted by evaluation requests and the sink that
//! stores them.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Event type recorded for every public update check.
pub const UPDATE_CHECK: &str = "update.check";

/// One entry of the activity log.
///
/// Constructed via [`ActivityRecord::new`] and enriched with
/// [`with_application`](ActivityRecord::with_application) and
/// [`with_payload`](ActivityRecord::with_payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Dot-separated event name, e.g. `"update.check"`.
    pub event_type: String,
    pub application_id: Option<DbId>,
    /// Raw request context and outcome.
    pub payload: serde_json::Value,
    pub occurred_at: Timestamp,
}

impl ActivityRecord {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            application_id: None,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_application(mut self, application_id: DbId) -> Self {
        self.application_id = Some(application_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Durable destination for activity records.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn record(&self, record: &ActivityRecord) -> Result<(), CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_record_has_empty_payload() {
        let record = ActivityRecord::new(UPDATE_CHECK);
        assert_eq!(record.event_type, "update.check");
        assert!(record.application_id.is_none());
        assert!(record.payload.as_object().is_some_and(|m| m.is_empty()));
    }

    #[test]
    fn builder_attaches_application_and_payload() {
        let record = ActivityRecord::new(UPDATE_CHECK)
            .with_application(4)
            .with_payload(serde_json::json!({"country": "US"}));
        assert_eq!(record.application_id, Some(4));
        assert_eq!(record.payload["country"], "US");
    }
}
