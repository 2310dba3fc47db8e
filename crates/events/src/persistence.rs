//! Durable activity persistence service.
//!
//! [`ActivityPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and hands every received record to an [`ActivitySink`]. It runs as a
//! long-lived background task and stops when the bus sender is dropped.

use std::sync::Arc;

use releasegate_core::activity::{ActivityRecord, ActivitySink};
use tokio::sync::broadcast;

/// Background service that persists activity records.
pub struct ActivityPersistence;

impl ActivityPersistence {
    /// Run the persistence loop until the channel closes.
    ///
    /// Sink failures are logged and the record is dropped; they never reach
    /// the request that published it.
    pub async fn run<S>(sink: Arc<S>, mut receiver: broadcast::Receiver<ActivityRecord>)
    where
        S: ActivitySink + ?Sized,
    {
        loop {
            match receiver.recv().await {
                Ok(record) => {
                    if let Err(e) = sink.record(&record).await {
                        tracing::error!(
                            error = %e,
                            event_type = %record.event_type,
                            application_id = ?record.application_id,
                            "Failed to persist activity record"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Activity persistence lagged, some records were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity persistence shutting down");
                    break;
                }
            }
        }
    }
}
