//! Filter and ordering layer shared by the live feed and the map.
//!
//! [`query`] is a pure function of a snapshot and an [`EventFilter`]: the same
//! inputs always give the same events in the same order. Predicates are ANDed
//! across dimensions and ORed within one dimension's set.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{EventStatus, HazardType, Priority, Severity};
use crate::error::CoreError;
use crate::hazard::{HazardEvent, Location};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: usize = 500;

/// Severity at or above which an open event counts as critical.
pub const CRITICAL_SEVERITY: u8 = 4;

// ---------------------------------------------------------------------------
// Bounding box
// ---------------------------------------------------------------------------

/// Inclusive geographic rectangle. Does not wrap the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Result<Self, CoreError> {
        let bbox = Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let lat_ok = |v: f64| (-90.0..=90.0).contains(&v);
        let lng_ok = |v: f64| (-180.0..=180.0).contains(&v);
        if !(lat_ok(self.min_lat)
            && lat_ok(self.max_lat)
            && lng_ok(self.min_lng)
            && lng_ok(self.max_lng))
        {
            return Err(CoreError::Validation(
                "Bounding box coordinates out of range".to_string(),
            ));
        }
        if self.min_lat > self.max_lat || self.min_lng > self.max_lng {
            return Err(CoreError::Validation(
                "Bounding box minimum exceeds maximum".to_string(),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, location: &Location) -> bool {
        (self.min_lat..=self.max_lat).contains(&location.latitude)
            && (self.min_lng..=self.max_lng).contains(&location.longitude)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Independently optional predicates. An empty set means "any value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub severities: Vec<Severity>,
    pub hazard_types: Vec<HazardType>,
    pub statuses: Vec<EventStatus>,
    pub priorities: Vec<Priority>,
    /// Case-insensitive substring over title, description, location name,
    /// reporter name and tracking id.
    pub text: Option<String>,
    pub bbox: Option<BoundingBox>,
    /// Inclusive lower bound on `created_at`.
    pub since: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub until: Option<Timestamp>,
    pub public_only: bool,
}

impl EventFilter {
    pub fn with_severities(mut self, severities: impl IntoIterator<Item = Severity>) -> Self {
        self.severities = severities.into_iter().collect();
        self
    }

    pub fn with_hazard_types(mut self, types: impl IntoIterator<Item = HazardType>) -> Self {
        self.hazard_types = types.into_iter().collect();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = EventStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_window(mut self, since: Option<Timestamp>, until: Option<Timestamp>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    pub fn public_only(mut self) -> Self {
        self.public_only = true;
        self
    }

    /// Reject filters that can never be satisfied because they are malformed.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(bbox) = &self.bbox {
            bbox.validate()?;
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(CoreError::Validation(
                    "Time window start is after its end".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, event: &HazardEvent) -> bool {
        self.matches_with_needle(event, self.needle().as_deref())
    }

    fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_with_needle(&self, event: &HazardEvent, needle: Option<&str>) -> bool {
        if !in_set(&self.severities, &event.severity)
            || !in_set(&self.hazard_types, &event.hazard_type)
            || !in_set(&self.statuses, &event.status)
            || !in_set(&self.priorities, &event.priority)
        {
            return false;
        }
        if self.public_only && !event.public_visibility {
            return false;
        }
        if let Some(bbox) = &self.bbox {
            if !bbox.contains(&event.location) {
                return false;
            }
        }
        if self.since.is_some_and(|since| event.created_at < since) {
            return false;
        }
        if self.until.is_some_and(|until| event.created_at > until) {
            return false;
        }
        match needle {
            Some(needle) => text_matches(event, needle),
            None => true,
        }
    }
}

fn in_set<T: PartialEq>(set: &[T], value: &T) -> bool {
    set.is_empty() || set.contains(value)
}

fn text_matches(event: &HazardEvent, needle: &str) -> bool {
    [
        event.title.as_str(),
        event.description.as_str(),
        event.location.name.as_str(),
        event.reporter.name.as_str(),
        event.tracking_id.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Run `filter` over `snapshot`, newest first.
///
/// Ties on `created_at` fall back to priority then severity, both
/// descending; remaining ties keep snapshot (insertion) order. Any stored
/// event that violates its invariants aborts the whole query.
pub fn query(
    snapshot: &[Arc<HazardEvent>],
    filter: &EventFilter,
) -> Result<Vec<Arc<HazardEvent>>, CoreError> {
    filter.validate()?;

    for event in snapshot {
        if let Err(e) = event.check_invariants() {
            tracing::error!(event_id = %event.id, error = %e, "Stored event violates invariants");
            return Err(e);
        }
    }

    let needle = filter.needle();
    let mut matched: Vec<Arc<HazardEvent>> = snapshot
        .iter()
        .filter(|e| filter.matches_with_needle(e, needle.as_deref()))
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| b.severity.cmp(&a.severity))
    });

    Ok(matched)
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Offset/limit window applied after ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    /// `None` means unlimited.
    pub limit: Option<usize>,
}

impl Page {
    /// Build a page, clamping `limit` into `[1, MAX_PAGE_LIMIT]`.
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self {
            offset,
            limit: limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT)),
        }
    }

    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Dashboard statistics over a set of events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_hazard_type: BTreeMap<&'static str, usize>,
    pub by_severity: BTreeMap<u8, usize>,
    /// Severity 4+ events still awaiting a final decision.
    pub critical_open: usize,
}

/// Count events per status, hazard type and severity.
///
/// Every catalog value appears as a key, with zero when absent.
pub fn summarize<'a>(events: impl IntoIterator<Item = &'a HazardEvent>) -> EventSummary {
    let mut summary = EventSummary {
        total: 0,
        by_status: EventStatus::all().iter().map(|s| (s.as_str(), 0)).collect(),
        by_hazard_type: HazardType::all().iter().map(|t| (t.as_str(), 0)).collect(),
        by_severity: Severity::all().map(|s| (s.get(), 0)).collect(),
        critical_open: 0,
    };

    for event in events {
        summary.total += 1;
        *summary.by_status.entry(event.status.as_str()).or_default() += 1;
        *summary.by_hazard_type.entry(event.hazard_type.as_str()).or_default() += 1;
        *summary.by_severity.entry(event.severity.get()).or_default() += 1;
        if event.severity.get() >= CRITICAL_SEVERITY && !event.status.is_terminal() {
            summary.critical_open += 1;
        }
    }

    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
