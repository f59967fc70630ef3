//! Query parameter types for the event listing endpoints.
//!
//! Set-valued filters arrive as comma-separated lists
//! (`?severity=4,5&hazard_type=tsunami`) and are parsed with the catalog's
//! `FromStr` impls, so an unknown value is a 400 `INVALID_ENUM`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use hazardwatch_core::catalog::{EventStatus, HazardType, Priority, Severity};
use hazardwatch_core::error::CoreError;
use hazardwatch_core::query::{BoundingBox, EventFilter, Page};
use hazardwatch_engine::EventQuery;
use serde::Deserialize;

use crate::error::AppError;

/// `GET /api/v1/events` and `/events/summary` query string.
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    /// Session whose read state annotates the results.
    pub session: Option<String>,
    pub severity: Option<String>,
    pub hazard_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lng: Option<f64>,
    pub max_lng: Option<f64>,
    /// RFC 3339 lower bound on `created_at`.
    pub since: Option<DateTime<Utc>>,
    /// RFC 3339 upper bound on `created_at`.
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_only: bool,
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl EventListParams {
    pub fn to_filter(&self) -> Result<EventFilter, AppError> {
        let bbox = match (self.min_lat, self.max_lat, self.min_lng, self.max_lng) {
            (None, None, None, None) => None,
            (Some(min_lat), Some(max_lat), Some(min_lng), Some(max_lng)) => {
                Some(BoundingBox::new(min_lat, max_lat, min_lng, max_lng)?)
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Bounding box needs all of min_lat, max_lat, min_lng, max_lng".into(),
                ))
            }
        };

        let filter = EventFilter {
            severities: parse_list::<Severity>(self.severity.as_deref())?,
            hazard_types: parse_list::<HazardType>(self.hazard_type.as_deref())?,
            statuses: parse_list::<EventStatus>(self.status.as_deref())?,
            priorities: parse_list::<Priority>(self.priority.as_deref())?,
            text: self.q.clone(),
            bbox,
            since: self.since,
            until: self.until,
            public_only: self.public_only,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn to_query(&self) -> Result<EventQuery, AppError> {
        Ok(EventQuery {
            filter: self.to_filter()?,
            session: self.session.clone().filter(|s| !s.trim().is_empty()),
            unread_only: self.unread_only,
            page: Page::new(self.offset.unwrap_or(0), self.limit),
        })
    }
}

/// Parse a comma-separated list; blank entries are ignored.
fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>, CoreError>
where
    T: FromStr<Err = CoreError>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
