//! [`AlertService`]: the single entry point for feed, map and review views.
//!
//! Composes the store, the query layer, read tracking, the review workflow
//! and the synthetic feed. Every successful write is published on the
//! notification bus.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hazardwatch_core::error::CoreError;
use hazardwatch_core::hazard::{HazardEvent, HazardReport, NewHazardEvent};
use hazardwatch_core::query::{self, EventFilter, EventSummary, Page};
use hazardwatch_core::review::{ReviewAction, StatusChange};
use hazardwatch_core::types::EventId;
use hazardwatch_events::{AlertNotification, EventBus};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::EngineConfig;
use crate::demo;
use crate::feed::{FeedController, FeedStatus};
use crate::read_state::ReadStateTracker;
use crate::store::{EventStore, InMemoryEventStore};

/// A query result row: the event plus the caller's read flag.
#[derive(Debug, Clone, Serialize)]
pub struct QueriedEvent {
    #[serde(flatten)]
    pub event: Arc<HazardEvent>,
    pub is_read: bool,
}

/// Everything `query_events` needs from the caller.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub filter: EventFilter,
    /// Session whose read state annotates the results; `None` reads as all
    /// unread.
    pub session: Option<String>,
    pub unread_only: bool,
    pub page: Page,
}

impl EventQuery {
    pub fn for_session(session: impl Into<String>) -> Self {
        Self {
            session: Some(session.into()),
            ..Self::default()
        }
    }
}

pub struct AlertService {
    store: Arc<dyn EventStore>,
    read_state: ReadStateTracker,
    bus: Arc<EventBus>,
    feed: FeedController,
    config: EngineConfig,
}

impl AlertService {
    /// Service backed by a fresh in-memory store.
    pub fn new(config: EngineConfig) -> Self {
        let store = Arc::new(InMemoryEventStore::new(config.tracking_id_prefix.clone()));
        Self::with_store(config, store)
    }

    /// Service over any [`EventStore`] implementation.
    pub fn with_store(config: EngineConfig, store: Arc<dyn EventStore>) -> Self {
        let bus = Arc::new(EventBus::new(config.notification_capacity));
        let feed = FeedController::new(Arc::clone(&store), Arc::clone(&bus));
        Self {
            store,
            read_state: ReadStateTracker::new(),
            bus,
            feed,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertNotification> {
        self.bus.subscribe()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Validate an external report and store it as a `pending` event.
    pub async fn submit_report(&self, report: HazardReport) -> Result<Arc<HazardEvent>, CoreError> {
        let draft = report.into_draft()?;
        self.insert(draft).await
    }

    async fn insert(&self, draft: NewHazardEvent) -> Result<Arc<HazardEvent>, CoreError> {
        let event = self.store.insert(draft).await?;
        self.bus.publish(AlertNotification::created(&event));
        Ok(event)
    }

    /// Apply a reviewer action to an event.
    pub async fn review_event(
        &self,
        id: EventId,
        action: ReviewAction,
        reviewer: &str,
        notes: Option<String>,
    ) -> Result<Arc<HazardEvent>, CoreError> {
        let change = StatusChange::new(action.target_status(), reviewer, notes, Utc::now());
        let event = self.store.update_status(id, change).await?;
        self.bus.publish(AlertNotification::reviewed(&event));
        Ok(event)
    }

    /// Insert the demo reports and replay their review decisions.
    ///
    /// Reports whose tracking id is already taken are skipped, so seeding
    /// twice is harmless. Returns the number inserted.
    pub async fn seed_demo_events(&self) -> Result<usize, CoreError> {
        let mut inserted = 0;
        for demo in demo::demo_events()? {
            let event = match self.insert(demo.draft).await {
                Ok(event) => event,
                Err(CoreError::DuplicateTrackingId(tracking_id)) => {
                    tracing::debug!(%tracking_id, "Demo event already present");
                    continue;
                }
                Err(e) => return Err(e),
            };
            if let Some(review) = demo.review {
                self.review_event(
                    event.id,
                    review.action,
                    review.reviewer,
                    review.notes.map(str::to_string),
                )
                .await?;
            }
            inserted += 1;
        }
        tracing::info!(count = inserted, "Seeded demo events");
        Ok(inserted)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_event(&self, id: EventId) -> Result<Arc<HazardEvent>, CoreError> {
        self.store.get(id).await
    }

    pub async fn event_count(&self) -> usize {
        self.store.len().await
    }

    /// Filtered, ordered, read-annotated events for one caller.
    pub async fn query_events(&self, query: &EventQuery) -> Result<Vec<QueriedEvent>, CoreError> {
        let snapshot = self.store.snapshot().await;
        let matched = query::query(snapshot.events(), &query.filter)?;

        let read = match &query.session {
            Some(session) => self.read_state.read_ids(session).await,
            None => Default::default(),
        };

        let rows = matched
            .into_iter()
            .map(|event| QueriedEvent {
                is_read: read.contains(&event.id),
                event,
            })
            .filter(|row| !(query.unread_only && row.is_read));

        Ok(query.page.apply(rows))
    }

    /// Dashboard totals over the events matching `filter`.
    pub async fn summary(&self, filter: &EventFilter) -> Result<EventSummary, CoreError> {
        let snapshot = self.store.snapshot().await;
        let matched = query::query(snapshot.events(), filter)?;
        Ok(query::summarize(matched.iter().map(|e| e.as_ref())))
    }

    // -----------------------------------------------------------------------
    // Read state
    // -----------------------------------------------------------------------

    /// Mark one event read for `session`. Fails with `NotFound` for ids the
    /// store has never seen.
    pub async fn mark_read(&self, session: &str, id: EventId) -> Result<(), CoreError> {
        self.store.get(id).await?;
        self.read_state.mark_read(session, id).await;
        Ok(())
    }

    /// Mark every event currently stored as read. Returns how many were
    /// newly marked.
    pub async fn mark_all_read(&self, session: &str) -> usize {
        let snapshot = self.store.snapshot().await;
        self.read_state.mark_all_read(session, snapshot.ids()).await
    }

    pub async fn unread_count(&self, session: &str) -> usize {
        let snapshot = self.store.snapshot().await;
        self.read_state.unread_count(session, snapshot.events()).await
    }

    pub async fn forget_session(&self, session: &str) -> bool {
        self.read_state.forget_session(session).await
    }

    // -----------------------------------------------------------------------
    // Feed lifecycle
    // -----------------------------------------------------------------------

    /// Start the synthetic feed; a no-op returning `false` if running.
    pub async fn start_feed(
        &self,
        interval: Duration,
        probability: f64,
    ) -> Result<bool, CoreError> {
        self.feed.start(interval, probability).await
    }

    /// Start the feed with the configured interval and probability.
    pub async fn start_default_feed(&self) -> Result<bool, CoreError> {
        self.start_feed(self.config.feed_interval, self.config.feed_probability)
            .await
    }

    /// Stop the synthetic feed; a no-op returning `false` if stopped.
    pub async fn stop_feed(&self) -> bool {
        self.feed.stop().await
    }

    pub async fn feed_status(&self) -> FeedStatus {
        self.feed.status().await
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }
}
