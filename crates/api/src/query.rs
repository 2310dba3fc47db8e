//! Shared query parameter types for API handlers.

use releasegate_core::types::DbId;
use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

/// Query parameters for `GET /activity` (`?app_id=&limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    pub app_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ActivityParams {
    /// Requested page size, clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Query parameters for release listing (`?status=`).
#[derive(Debug, Default, Deserialize)]
pub struct ReleaseListParams {
    pub status: Option<String>,
}
