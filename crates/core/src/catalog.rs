//! Static taxonomy of hazard types, severity levels, statuses and priorities.
//!
//! Pure constant lookup with no state. Every enumeration has one canonical
//! kebab-case spelling (`as_str`), used both on the wire and by `FromStr`.
//! Unknown spellings are a caller contract violation and fail with
//! [`CoreError::InvalidEnum`]; they are never defaulted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Hazard type
// ---------------------------------------------------------------------------

/// Closed set of coastal hazard kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HazardType {
    Tsunami,
    StormSurge,
    HighWaves,
    Flooding,
    Erosion,
}

impl HazardType {
    pub fn all() -> &'static [HazardType] {
        &[
            Self::Tsunami,
            Self::StormSurge,
            Self::HighWaves,
            Self::Flooding,
            Self::Erosion,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tsunami => "tsunami",
            Self::StormSurge => "storm-surge",
            Self::HighWaves => "high-waves",
            Self::Flooding => "flooding",
            Self::Erosion => "erosion",
        }
    }

    /// Human-readable label, e.g. `"storm surge"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tsunami => "tsunami",
            Self::StormSurge => "storm surge",
            Self::HighWaves => "high waves",
            Self::Flooding => "flooding",
            Self::Erosion => "erosion",
        }
    }
}

/// Map glyph for a hazard type.
pub fn hazard_icon(hazard_type: HazardType) -> &'static str {
    match hazard_type {
        HazardType::Tsunami | HazardType::HighWaves => "\u{1F30A}",
        HazardType::StormSurge => "\u{26C8}\u{FE0F}",
        HazardType::Flooding => "\u{1F4A7}",
        HazardType::Erosion => "\u{1F3D4}\u{FE0F}",
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Lowest severity level.
pub const MIN_SEVERITY: u8 = 1;

/// Highest severity level (most severe).
pub const MAX_SEVERITY: u8 = 5;

/// Numeric intensity rating, always within `[MIN_SEVERITY, MAX_SEVERITY]`.
///
/// The only constructor is [`Severity::new`] (also used by deserialization),
/// so an out-of-range value can never be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub fn new(level: u8) -> Result<Self, CoreError> {
        if (MIN_SEVERITY..=MAX_SEVERITY).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CoreError::InvalidEnum {
                kind: "severity",
                value: level.to_string(),
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All severity levels, ascending.
    pub fn all() -> impl Iterator<Item = Severity> {
        (MIN_SEVERITY..=MAX_SEVERITY).map(Severity)
    }
}

impl TryFrom<u8> for Severity {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker color token for a severity level (map pins and badges).
pub fn severity_color(severity: Severity) -> &'static str {
    match severity.get() {
        5 => "#dc2626",
        4 => "#ea580c",
        3 => "#ca8a04",
        2 => "#2563eb",
        _ => "#16a34a",
    }
}

pub fn severity_label(severity: Severity) -> &'static str {
    match severity.get() {
        5 => "critical",
        4 => "high",
        3 => "moderate",
        2 => "low",
        _ => "minimal",
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Review lifecycle stage of a hazard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Pending,
    UnderReview,
    Verified,
    FalseAlarm,
    Rejected,
}

impl EventStatus {
    pub fn all() -> &'static [EventStatus] {
        &[
            Self::Pending,
            Self::UnderReview,
            Self::Verified,
            Self::FalseAlarm,
            Self::Rejected,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under-review",
            Self::Verified => "verified",
            Self::FalseAlarm => "false-alarm",
            Self::Rejected => "rejected",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        legal_transitions(*self).is_empty()
    }
}

/// The single legality table for review transitions.
pub fn legal_transitions(status: EventStatus) -> &'static [EventStatus] {
    match status {
        EventStatus::Pending => &[
            EventStatus::UnderReview,
            EventStatus::Verified,
            EventStatus::FalseAlarm,
            EventStatus::Rejected,
        ],
        EventStatus::UnderReview => &[
            EventStatus::Verified,
            EventStatus::FalseAlarm,
            EventStatus::Rejected,
        ],
        EventStatus::Verified | EventStatus::FalseAlarm | EventStatus::Rejected => &[],
    }
}

pub fn status_color(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Verified => "default",
        EventStatus::UnderReview => "secondary",
        EventStatus::Pending => "outline",
        EventStatus::FalseAlarm | EventStatus::Rejected => "destructive",
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Urgency label used for triage and as a sort tie-break.
///
/// Declared in ascending order so the derived `Ord` ranks `Critical` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "text-red-600",
        Priority::High => "text-orange-600",
        Priority::Medium => "text-yellow-600",
        Priority::Low => "text-green-600",
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// Kind of file attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn all() -> &'static [MediaKind] {
        &[Self::Image, Self::Video]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

// ---------------------------------------------------------------------------
// String conversions
// ---------------------------------------------------------------------------

fn parse_enum<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    as_str: impl Fn(&T) -> &'static str,
) -> Result<T, CoreError> {
    all.iter()
        .find(|candidate| as_str(candidate) == value)
        .copied()
        .ok_or_else(|| CoreError::InvalidEnum {
            kind,
            value: value.to_string(),
        })
}

impl FromStr for HazardType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum("hazard type", s, Self::all(), Self::as_str)
    }
}

impl FromStr for EventStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum("status", s, Self::all(), Self::as_str)
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum("priority", s, Self::all(), Self::as_str)
    }
}

impl FromStr for MediaKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum("media kind", s, Self::all(), Self::as_str)
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: u8 = s.trim().parse().map_err(|_| CoreError::InvalidEnum {
            kind: "severity",
            value: s.to_string(),
        })?;
        Self::new(level)
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Coastal sites
// ---------------------------------------------------------------------------

/// A named monitoring location on the coastline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoastalSite {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Known coastal locations. The synthetic feed draws its locations from here.
pub const COASTAL_SITES: &[CoastalSite] = &[
    CoastalSite {
        name: "Dwarka Beach, Gujarat",
        latitude: 22.2394,
        longitude: 68.9685,
    },
    CoastalSite {
        name: "Chennai Port, Tamil Nadu",
        latitude: 13.1067,
        longitude: 80.3012,
    },
    CoastalSite {
        name: "Kovalam Beach, Kerala",
        latitude: 8.4004,
        longitude: 76.9787,
    },
    CoastalSite {
        name: "Salt Lake, Kolkata, West Bengal",
        latitude: 22.5958,
        longitude: 88.2636,
    },
    CoastalSite {
        name: "Colva Beach, Goa",
        latitude: 15.2891,
        longitude: 73.9213,
    },
    CoastalSite {
        name: "Puri Beach, Odisha",
        latitude: 19.7983,
        longitude: 85.8249,
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
