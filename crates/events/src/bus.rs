//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across request handlers.

use releasegate_core::activity::ActivityRecord;
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use releasegate_core::activity::{ActivityRecord, UPDATE_CHECK};
/// use releasegate_events::EventBus;
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
///
/// bus.publish(ActivityRecord::new(UPDATE_CHECK).with_application(1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ActivityRecord>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed records are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a record to all current subscribers.
    ///
    /// With no subscribers the record is dropped.
    pub fn publish(&self, record: ActivityRecord) {
        // A SendError only means there are zero receivers.
        if self.sender.send(record).is_err() {
            tracing::trace!("Activity record published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivityRecord> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
