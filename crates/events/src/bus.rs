//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans [`AlertNotification`]s out to every live-feed consumer.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use hazardwatch_core::catalog::{EventStatus, HazardType, Severity};
use hazardwatch_core::hazard::HazardEvent;
use hazardwatch_core::types::EventId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// AlertNotification
// ---------------------------------------------------------------------------

/// What happened to the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new event entered the store (report submission or synthetic feed).
    Created,
    /// A review action changed the event's status.
    Reviewed,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Reviewed => "reviewed",
        }
    }
}

/// A change to a hazard event, as seen by live-feed subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertNotification {
    pub kind: NotificationKind,
    pub event_id: EventId,
    pub tracking_id: String,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub status: EventStatus,
    pub title: String,

    /// When the notification was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl AlertNotification {
    /// Build a notification describing the current state of `event`.
    pub fn new(kind: NotificationKind, event: &HazardEvent) -> Self {
        Self {
            kind,
            event_id: event.id,
            tracking_id: event.tracking_id.clone(),
            hazard_type: event.hazard_type,
            severity: event.severity,
            status: event.status,
            title: event.title.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn created(event: &HazardEvent) -> Self {
        Self::new(NotificationKind::Created, event)
    }

    pub fn reviewed(event: &HazardEvent) -> Self {
        Self::new(NotificationKind::Reviewed, event)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`AlertNotification`].
pub struct EventBus {
    sender: broadcast::Sender<AlertNotification>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a notification to all current subscribers.
    ///
    /// If there are no active subscribers the notification is dropped.
    pub fn publish(&self, notification: AlertNotification) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(notification);
    }

    /// Subscribe to all notifications published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertNotification> {
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
