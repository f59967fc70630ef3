//! The `HazardEvent` entity, its insert draft, and report validation.
//!
//! [`HazardReport`] is the raw submission payload (enum fields still as
//! strings). [`HazardReport::into_draft`] validates it into a
//! [`NewHazardEvent`], the typed input of the event store. The store turns a
//! draft into a [`HazardEvent`] via [`NewHazardEvent::into_event`], which is
//! the only place an event's identity, creation time and initial status are
//! fixed.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{EventStatus, HazardType, MediaKind, Priority, Severity};
use crate::error::CoreError;
use crate::types::{EventId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a caller-supplied tracking id.
pub const MAX_TRACKING_ID_LENGTH: usize = 32;

/// Highest valid confidence score.
pub const MAX_CONFIDENCE: u8 = 100;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Where a hazard was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Display name, e.g. `"Dwarka Beach, Gujarat"`.
    pub name: String,
}

impl Location {
    pub fn is_within_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Who submitted the report. `verified` is the reporter's own trust status,
/// unrelated to the event's review status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub verified: bool,
}

/// A file attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub kind: MediaKind,
    pub url: String,
    pub name: String,
}

/// A single reported or detected coastal hazard observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEvent {
    pub id: EventId,
    /// Human-readable display id, e.g. `HR-001234`.
    pub tracking_id: String,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub status: EventStatus,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub reporter: Reporter,
    /// Quality score in `0..=100`.
    pub confidence: u8,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    pub affected_people: Option<u64>,
    pub affected_areas: Vec<String>,
    pub media: Vec<MediaFile>,
    pub public_visibility: bool,
}

impl HazardEvent {
    /// Check the invariants every stored event must satisfy.
    ///
    /// A failure here means the data was corrupted after validation and is
    /// reported as [`CoreError::Internal`], never repaired.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if Severity::new(self.severity.get()).is_err() {
            return Err(self.invariant_violation("severity out of range"));
        }
        if self.confidence > MAX_CONFIDENCE {
            return Err(self.invariant_violation("confidence out of range"));
        }
        if !self.location.is_within_range() {
            return Err(self.invariant_violation("coordinates out of range"));
        }
        if self.status.is_terminal() && (self.reviewed_by.is_none() || self.reviewed_at.is_none())
        {
            return Err(self.invariant_violation("terminal status without review record"));
        }
        Ok(())
    }

    fn invariant_violation(&self, what: &str) -> CoreError {
        CoreError::Internal(format!("event {} ({}): {what}", self.tracking_id, self.id))
    }
}

// ---------------------------------------------------------------------------
// Insert draft
// ---------------------------------------------------------------------------

/// Typed, validated input to the event store.
///
/// `id` and `tracking_id` are optional; the store assigns them when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHazardEvent {
    pub id: Option<EventId>,
    pub tracking_id: Option<String>,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub reporter: Reporter,
    pub confidence: u8,
    pub affected_people: Option<u64>,
    pub affected_areas: Vec<String>,
    pub media: Vec<MediaFile>,
    pub public_visibility: bool,
}

impl NewHazardEvent {
    /// Re-check the ranges that typed fields cannot enforce on their own.
    ///
    /// Producers that bypass [`HazardReport`] (e.g. the synthetic feed) go
    /// through this check in the store.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.location.is_within_range() {
            return Err(CoreError::Validation(format!(
                "Coordinates ({}, {}) are out of range",
                self.location.latitude, self.location.longitude
            )));
        }
        if self.confidence > MAX_CONFIDENCE {
            return Err(CoreError::Validation(format!(
                "Confidence {} exceeds {MAX_CONFIDENCE}",
                self.confidence
            )));
        }
        if let Some(tracking_id) = &self.tracking_id {
            validate_tracking_id(tracking_id)?;
        }
        Ok(())
    }

    /// Materialize the stored entity. Status always starts at `pending` and
    /// no review fields are set.
    pub fn into_event(
        self,
        id: EventId,
        tracking_id: String,
        created_at: Timestamp,
    ) -> HazardEvent {
        HazardEvent {
            id,
            tracking_id,
            hazard_type: self.hazard_type,
            severity: self.severity,
            status: EventStatus::Pending,
            priority: self.priority,
            title: self.title,
            description: self.description,
            location: self.location,
            reporter: self.reporter,
            confidence: self.confidence,
            created_at,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            affected_people: self.affected_people,
            affected_areas: self.affected_areas,
            media: self.media,
            public_visibility: self.public_visibility,
        }
    }
}

/// Validate a caller-supplied tracking id: non-blank, bounded, and made of
/// ASCII alphanumerics and dashes.
pub fn validate_tracking_id(tracking_id: &str) -> Result<(), CoreError> {
    if tracking_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Tracking id must not be empty".to_string(),
        ));
    }
    if tracking_id.len() > MAX_TRACKING_ID_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tracking id exceeds maximum length of {MAX_TRACKING_ID_LENGTH} characters"
        )));
    }
    if !tracking_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Invalid tracking id '{tracking_id}'. Only letters, digits and '-' are allowed"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReporterInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaInput {
    pub kind: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Raw hazard report as submitted by a citizen, official, or adapter.
///
/// Numeric fields are wide on purpose so out-of-range input reaches
/// validation instead of failing opaquely at deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HazardReport {
    pub tracking_id: Option<String>,
    pub hazard_type: String,
    #[validate(range(min = 1, max = 5))]
    pub severity: i64,
    /// Defaults to `medium` when absent. Never derived from severity.
    pub priority: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(nested)]
    pub location: LocationInput,
    #[validate(nested)]
    pub reporter: ReporterInput,
    #[validate(range(min = 0, max = 100))]
    pub confidence: i64,
    #[validate(range(min = 0))]
    pub affected_people: Option<i64>,
    #[serde(default)]
    pub affected_areas: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub media: Vec<MediaInput>,
    #[serde(default)]
    pub public_visibility: bool,
}

impl HazardReport {
    /// Validate ranges and enum membership, producing a store draft.
    ///
    /// Every failure, including an unknown enum spelling, is reported as
    /// [`CoreError::Validation`].
    pub fn into_draft(self) -> Result<NewHazardEvent, CoreError> {
        self.validate()?;
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation("Title must not be blank".to_string()));
        }

        let hazard_type = self.hazard_type.parse::<HazardType>().map_err(as_validation)?;
        let severity = u8::try_from(self.severity)
            .map_err(|_| CoreError::Validation(format!("Severity {} out of range", self.severity)))
            .and_then(|level| Severity::new(level).map_err(as_validation))?;
        let priority = match self.priority.as_deref() {
            Some(raw) => raw.parse::<Priority>().map_err(as_validation)?,
            None => Priority::Medium,
        };
        let confidence = u8::try_from(self.confidence).map_err(|_| {
            CoreError::Validation(format!("Confidence {} out of range", self.confidence))
        })?;
        let affected_people = self
            .affected_people
            .map(|n| {
                u64::try_from(n).map_err(|_| {
                    CoreError::Validation(format!("Affected people {n} must be non-negative"))
                })
            })
            .transpose()?;

        let media = self
            .media
            .into_iter()
            .map(|m| {
                Ok(MediaFile {
                    kind: m.kind.parse::<MediaKind>().map_err(as_validation)?,
                    url: m.url,
                    name: m.name,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let tracking_id = self.tracking_id.map(|t| t.trim().to_string());

        let draft = NewHazardEvent {
            id: None,
            tracking_id,
            hazard_type,
            severity,
            priority,
            title: self.title.trim().to_string(),
            description: self.description,
            location: Location {
                latitude: self.location.latitude,
                longitude: self.location.longitude,
                name: self.location.name,
            },
            reporter: Reporter {
                name: self.reporter.name,
                phone: self.reporter.phone,
                email: self.reporter.email,
                verified: self.reporter.verified,
            },
            confidence,
            affected_people,
            affected_areas: self
                .affected_areas
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            media,
            public_visibility: self.public_visibility,
        };

        draft.validate()?;
        Ok(draft)
    }
}

fn as_validation(err: CoreError) -> CoreError {
    match err {
        CoreError::InvalidEnum { kind, value } => {
            CoreError::Validation(format!("Invalid {kind} '{value}'"))
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn report_json() -> serde_json::Value {
        json!({
            "hazard_type": "tsunami",
            "severity": 5,
            "priority": "critical",
            "title": "Massive waves approaching Dwarka coast",
            "description": "Water level rising rapidly.",
            "location": { "latitude": 22.2394, "longitude": 68.9685, "name": "Dwarka Beach, Gujarat" },
            "reporter": { "name": "Rajesh Patel", "email": "rajesh.patel@example.com", "verified": true },
            "confidence": 85,
            "affected_people": 15000,
            "affected_areas": ["Dwarka", " Jamnagar ", ""],
            "media": [{ "kind": "image", "url": "https://example.com/a.jpg", "name": "a.jpg" }],
            "public_visibility": true
        })
    }

    fn report(value: serde_json::Value) -> HazardReport {
        serde_json::from_value(value).expect("report should deserialize")
    }

    #[test]
    fn valid_report_produces_typed_draft() {
        let draft = report(report_json()).into_draft().unwrap();
        assert_eq!(draft.hazard_type, HazardType::Tsunami);
        assert_eq!(draft.severity.get(), 5);
        assert_eq!(draft.priority, Priority::Critical);
        assert_eq!(draft.confidence, 85);
        assert_eq!(draft.affected_people, Some(15000));
        assert_eq!(draft.affected_areas, vec!["Dwarka", "Jamnagar"]);
        assert_eq!(draft.media[0].kind, MediaKind::Image);
        assert!(draft.id.is_none());
        assert!(draft.tracking_id.is_none());
    }

    #[test]
    fn missing_priority_defaults_to_medium() {
        let mut value = report_json();
        value.as_object_mut().unwrap().remove("priority");
        let draft = report(value).into_draft().unwrap();
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn severity_out_of_range_is_a_validation_error() {
        for bad in [0, 6, -1, 300] {
            let mut value = report_json();
            value["severity"] = json!(bad);
            assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        let mut value = report_json();
        value["location"]["latitude"] = json!(91.0);
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));

        let mut value = report_json();
        value["location"]["longitude"] = json!(-180.5);
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        let mut value = report_json();
        value["confidence"] = json!(101);
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_hazard_type_is_reported_as_validation() {
        let mut value = report_json();
        value["hazard_type"] = json!("tornado");
        let err = report(value).into_draft().unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg) if msg.contains("tornado"));
    }

    #[test]
    fn unknown_media_kind_is_rejected() {
        let mut value = report_json();
        value["media"][0]["kind"] = json!("audio");
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_reporter_email_is_rejected() {
        let mut value = report_json();
        value["reporter"]["email"] = json!("not-an-email");
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut value = report_json();
        value["title"] = json!("");
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn negative_affected_people_is_rejected() {
        let mut value = report_json();
        value["affected_people"] = json!(-3);
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn supplied_tracking_id_is_checked() {
        let mut value = report_json();
        value["tracking_id"] = json!("HR 001");
        assert_matches!(report(value).into_draft(), Err(CoreError::Validation(_)));

        let mut value = report_json();
        value["tracking_id"] = json!("  HR-009999 ");
        let draft = report(value).into_draft().unwrap();
        assert_eq!(draft.tracking_id.as_deref(), Some("HR-009999"));
    }

    #[test]
    fn into_event_starts_pending_without_review_fields() {
        let draft = report(report_json()).into_draft().unwrap();
        let event = draft.into_event(uuid::Uuid::new_v4(), "HR-000001".into(), chrono::Utc::now());
        assert_eq!(event.status, EventStatus::Pending);
        assert!(event.reviewed_by.is_none());
        assert!(event.reviewed_at.is_none());
        assert!(event.review_notes.is_none());
        assert!(event.check_invariants().is_ok());
    }

    #[test]
    fn corrupted_event_fails_invariant_check() {
        let draft = report(report_json()).into_draft().unwrap();
        let mut event =
            draft.into_event(uuid::Uuid::new_v4(), "HR-000001".into(), chrono::Utc::now());
        event.confidence = 140;
        assert_matches!(event.check_invariants(), Err(CoreError::Internal(_)));
    }

    #[test]
    fn review_fields_are_omitted_from_json_until_set() {
        let draft = report(report_json()).into_draft().unwrap();
        let event = draft.into_event(uuid::Uuid::new_v4(), "HR-000001".into(), chrono::Utc::now());
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("reviewed_by").is_none());
        assert_eq!(value["status"], "pending");
        assert_eq!(value["hazard_type"], "tsunami");
        assert_eq!(value["severity"], 5);
    }
}
