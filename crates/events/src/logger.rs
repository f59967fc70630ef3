//! Background notification logger.
//!
//! [`NotificationLogger`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every [`AlertNotification`] to the tracing log. It runs as a
//! long-lived background task and stops when the bus sender is dropped.

use tokio::sync::broadcast;

use crate::bus::{AlertNotification, NotificationKind};

/// Severity at or above which a notification is logged at `warn`.
const WARN_SEVERITY: u8 = 5;

/// Background service that logs alert notifications.
pub struct NotificationLogger;

impl NotificationLogger {
    /// Run the logging loop.
    ///
    /// Returns the number of notifications logged once the channel is
    /// closed (i.e. the [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(mut receiver: broadcast::Receiver<AlertNotification>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(notification) => {
                    Self::log(&notification);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Notification logger lagged, some alerts were not logged"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification logger shutting down");
                    break;
                }
            }
        }
        logged
    }

    fn log(n: &AlertNotification) {
        let message = match n.kind {
            NotificationKind::Created => "New hazard alert",
            NotificationKind::Reviewed => "Hazard alert reviewed",
        };
        if n.severity.get() >= WARN_SEVERITY && n.kind == NotificationKind::Created {
            tracing::warn!(
                event_id = %n.event_id,
                tracking_id = %n.tracking_id,
                hazard_type = %n.hazard_type,
                severity = n.severity.get(),
                status = %n.status,
                "{message}"
            );
        } else {
            tracing::info!(
                event_id = %n.event_id,
                tracking_id = %n.tracking_id,
                hazard_type = %n.hazard_type,
                severity = n.severity.get(),
                status = %n.status,
                kind = n.kind.as_str(),
                "{message}"
            );
        }
    }
}
