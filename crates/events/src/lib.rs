//! Activity event plumbing.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, carrying
//!   [`ActivityRecord`](releasegate_core::activity::ActivityRecord)s.
//! - [`ActivityPersistence`]: background service that drains the bus into
//!   an [`ActivitySink`](releasegate_core::activity::ActivitySink).
//!
//! Publishing never blocks or fails the request that produced the record.

pub mod bus;
pub mod persistence;

pub use bus::EventBus;
pub use persistence::ActivityPersistence;
