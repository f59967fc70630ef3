//! Hazard event store.
//!
//! [`EventStore`] is the persistence seam: insert, get, snapshot and
//! status update. [`InMemoryEventStore`] keeps every event behind one
//! `RwLock`; records are immutable `Arc`s replaced wholesale on update, so a
//! snapshot taken before or after a write sees either the old record or the
//! new one, never a mix.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hazardwatch_core::error::CoreError;
use hazardwatch_core::hazard::{HazardEvent, NewHazardEvent};
use hazardwatch_core::review::{self, StatusChange};
use hazardwatch_core::types::{EventId, Timestamp};
use tokio::sync::RwLock;

/// Default prefix of generated tracking ids.
pub const DEFAULT_TRACKING_ID_PREFIX: &str = "HR";

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of every stored event, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    events: Vec<Arc<HazardEvent>>,
}

impl Snapshot {
    pub fn new(events: Vec<Arc<HazardEvent>>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Arc<HazardEvent>] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<HazardEvent>> {
        self.events.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.events.iter().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EventStore
// ---------------------------------------------------------------------------

/// Storage contract shared by the query layer, read tracking and reviews.
///
/// A durable backend only needs to honour these four operations.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Store a new event with status `pending` and `created_at = now`.
    ///
    /// Assigns `id` and `tracking_id` when absent. Fails with
    /// [`CoreError::DuplicateTrackingId`] if a supplied tracking id is taken.
    async fn insert(&self, draft: NewHazardEvent) -> Result<Arc<HazardEvent>, CoreError>;

    async fn get(&self, id: EventId) -> Result<Arc<HazardEvent>, CoreError>;

    async fn snapshot(&self) -> Snapshot;

    /// Apply a review transition atomically.
    async fn update_status(
        &self,
        id: EventId,
        change: StatusChange,
    ) -> Result<Arc<HazardEvent>, CoreError>;

    async fn len(&self) -> usize;
}

// ---------------------------------------------------------------------------
// InMemoryEventStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    events: Vec<Arc<HazardEvent>>,
    index: HashMap<EventId, usize>,
    tracking_ids: HashSet<String>,
    next_seq: u64,
    last_created: Option<Timestamp>,
}

impl Inner {
    fn next_tracking_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_seq += 1;
            let candidate = format!("{prefix}-{:06}", self.next_seq);
            if !self.tracking_ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Strictly increasing creation timestamps, so insertion order and
    /// `created_at` order never disagree.
    fn next_created_at(&mut self) -> Timestamp {
        let now = Utc::now();
        let created_at = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(created_at);
        created_at
    }
}

/// Process-local event store.
pub struct InMemoryEventStore {
    tracking_prefix: String,
    inner: RwLock<Inner>,
}

impl InMemoryEventStore {
    pub fn new(tracking_prefix: impl Into<String>) -> Self {
        Self {
            tracking_prefix: tracking_prefix.into(),
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKING_ID_PREFIX)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, draft: NewHazardEvent) -> Result<Arc<HazardEvent>, CoreError> {
        draft.validate()?;

        let mut inner = self.inner.write().await;

        let tracking_id = match &draft.tracking_id {
            Some(requested) => {
                if inner.tracking_ids.contains(requested) {
                    return Err(CoreError::DuplicateTrackingId(requested.clone()));
                }
                requested.clone()
            }
            None => inner.next_tracking_id(&self.tracking_prefix),
        };

        let id = draft.id.unwrap_or_else(uuid::Uuid::new_v4);
        if inner.index.contains_key(&id) {
            return Err(CoreError::Validation(format!("Event id {id} already exists")));
        }

        let created_at = inner.next_created_at();
        let event = Arc::new(draft.into_event(id, tracking_id, created_at));

        let position = inner.events.len();
        inner.events.push(Arc::clone(&event));
        inner.index.insert(id, position);
        inner.tracking_ids.insert(event.tracking_id.clone());

        tracing::debug!(
            event_id = %event.id,
            tracking_id = %event.tracking_id,
            hazard_type = %event.hazard_type,
            severity = event.severity.get(),
            "Stored hazard event"
        );

        Ok(event)
    }

    async fn get(&self, id: EventId) -> Result<Arc<HazardEvent>, CoreError> {
        let inner = self.inner.read().await;
        inner
            .index
            .get(&id)
            .map(|&i| Arc::clone(&inner.events[i]))
            .ok_or_else(|| CoreError::NotFound {
                entity: "HazardEvent",
                id: id.to_string(),
            })
    }

    async fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.inner.read().await.events.clone())
    }

    async fn update_status(
        &self,
        id: EventId,
        change: StatusChange,
    ) -> Result<Arc<HazardEvent>, CoreError> {
        let mut inner = self.inner.write().await;
        let position = *inner.index.get(&id).ok_or_else(|| CoreError::NotFound {
            entity: "HazardEvent",
            id: id.to_string(),
        })?;

        let current = &inner.events[position];
        let updated = Arc::new(review::apply_transition(current, &change)?);
        let from = current.status;
        inner.events[position] = Arc::clone(&updated);

        tracing::info!(
            event_id = %id,
            tracking_id = %updated.tracking_id,
            from = %from,
            to = %updated.status,
            reviewer = updated.reviewed_by.as_deref().unwrap_or(""),
            "Hazard event status changed"
        );

        Ok(updated)
    }

    async fn len(&self) -> usize {
        self.inner.read().await.events.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
