//! Hazard alert notification infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, the push channel of the live alert feed.
//! - [`AlertNotification`]: the envelope published for every stored or
//!   reviewed hazard event.
//! - [`NotificationLogger`]: background task that logs every notification.

pub mod bus;
pub mod logger;

pub use bus::{AlertNotification, EventBus, NotificationKind};
pub use logger::NotificationLogger;
