use std::sync::Arc;

use releasegate_core::selector::ReleaseSelector;
use releasegate_db::store::Catalog;
use releasegate_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend chosen at startup.
    pub catalog: Arc<dyn Catalog>,
    pub config: Arc<ServerConfig>,
    /// Carries activity records to the persistence task.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// A release selector over the catalog using the configured match mode.
    pub fn selector(&self) -> ReleaseSelector<'_, dyn Catalog> {
        ReleaseSelector::new(self.catalog.as_ref()).with_match_mode(self.config.match_mode)
    }
}
