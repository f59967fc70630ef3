//! Per-session read/unread tracking.
//!
//! Read state is an annotation layered over query results; it never touches
//! the stored events. Each session owns its own lock, so sessions only
//! contend on the outer map for as long as a lookup takes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use hazardwatch_core::hazard::HazardEvent;
use hazardwatch_core::types::EventId;
use tokio::sync::RwLock;

type ReadSet = Arc<RwLock<HashSet<EventId>>>;

/// Tracks which event ids each consumer session has marked as read.
///
/// Ids are held by value and may outlive the events they name; an unknown id
/// is simply never matched.
#[derive(Default)]
pub struct ReadStateTracker {
    sessions: RwLock<HashMap<String, ReadSet>>,
}

impl ReadStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    async fn session(&self, session: &str) -> Option<ReadSet> {
        self.sessions.read().await.get(session).cloned()
    }

    async fn session_or_create(&self, session: &str) -> ReadSet {
        if let Some(set) = self.session(session).await {
            return set;
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(session.to_string()).or_default())
    }

    /// Mark one event read. Returns `true` if it was previously unread.
    pub async fn mark_read(&self, session: &str, id: EventId) -> bool {
        let set = self.session_or_create(session).await;
        let inserted = set.write().await.insert(id);
        inserted
    }

    /// Mark every id in `ids` read. Returns how many were previously unread.
    pub async fn mark_all_read(
        &self,
        session: &str,
        ids: impl IntoIterator<Item = EventId>,
    ) -> usize {
        let set = self.session_or_create(session).await;
        let mut guard = set.write().await;
        ids.into_iter().filter(|id| guard.insert(*id)).count()
    }

    pub async fn is_read(&self, session: &str, id: EventId) -> bool {
        match self.session(session).await {
            Some(set) => set.read().await.contains(&id),
            None => false,
        }
    }

    /// Copy of the session's read set; empty for unknown sessions.
    pub async fn read_ids(&self, session: &str) -> HashSet<EventId> {
        match self.session(session).await {
            Some(set) => set.read().await.clone(),
            None => HashSet::new(),
        }
    }

    /// Count of `events` not yet read in `session`.
    pub async fn unread_count(&self, session: &str, events: &[Arc<HazardEvent>]) -> usize {
        let read = self.read_ids(session).await;
        events.iter().filter(|e| !read.contains(&e.id)).count()
    }

    /// Drop all read state for `session`. Returns `true` if it existed.
    pub async fn forget_session(&self, session: &str) -> bool {
        self.sessions.write().await.remove(session).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn default_state_is_unread() {
        let tracker = ReadStateTracker::new();
        assert!(!tracker.is_read("alice", Uuid::new_v4()).await);
        assert_eq!(tracker.session_count().await, 0);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let tracker = ReadStateTracker::new();
        let id = Uuid::new_v4();

        assert!(tracker.mark_read("alice", id).await);
        assert!(!tracker.mark_read("alice", id).await);

        assert!(tracker.is_read("alice", id).await);
        assert!(!tracker.is_read("bob", id).await);
    }

    #[tokio::test]
    async fn mark_all_read_counts_only_new_marks() {
        let tracker = ReadStateTracker::new();
        let ids: Vec<_> = (0..4).map(|_| Uuid::new_v4()).collect();

        tracker.mark_read("alice", ids[0]).await;
        assert_eq!(tracker.mark_all_read("alice", ids.clone()).await, 3);
        assert_eq!(tracker.mark_all_read("alice", ids.clone()).await, 0);
        assert_eq!(tracker.read_ids("alice").await.len(), 4);
    }

    #[tokio::test]
    async fn forgetting_a_session_resets_it_to_unread() {
        let tracker = ReadStateTracker::new();
        let id = Uuid::new_v4();
        tracker.mark_read("alice", id).await;

        assert!(tracker.forget_session("alice").await);
        assert!(!tracker.forget_session("alice").await);
        assert!(!tracker.is_read("alice", id).await);
    }
}
