//! Review workflow state machine.
//!
//! States and legal moves come from [`catalog::legal_transitions`]; this
//! module applies a requested change to an event, enforcing the reviewer and
//! notes rules. It never mutates in place: [`apply_transition`] returns the
//! fully updated event or an error, so the store can swap it in atomically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, EventStatus};
use crate::error::CoreError;
use crate::hazard::HazardEvent;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for review notes.
pub const MAX_REVIEW_NOTES_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A reviewer command, mapped onto a target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewAction {
    BeginReview,
    Verify,
    Reject,
    MarkFalseAlarm,
}

impl ReviewAction {
    pub fn all() -> &'static [ReviewAction] {
        &[
            Self::BeginReview,
            Self::Verify,
            Self::Reject,
            Self::MarkFalseAlarm,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeginReview => "begin-review",
            Self::Verify => "verify",
            Self::Reject => "reject",
            Self::MarkFalseAlarm => "mark-false-alarm",
        }
    }

    pub fn target_status(&self) -> EventStatus {
        match self {
            Self::BeginReview => EventStatus::UnderReview,
            Self::Verify => EventStatus::Verified,
            Self::Reject => EventStatus::Rejected,
            Self::MarkFalseAlarm => EventStatus::FalseAlarm,
        }
    }
}

impl FromStr for ReviewAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|a| a.as_str() == s)
            .copied()
            .ok_or_else(|| CoreError::InvalidEnum {
                kind: "review action",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// A requested status change, with everything needed to apply it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub to: EventStatus,
    pub reviewer: String,
    pub notes: Option<String>,
    pub at: Timestamp,
}

impl StatusChange {
    pub fn new(
        to: EventStatus,
        reviewer: impl Into<String>,
        notes: Option<String>,
        at: Timestamp,
    ) -> Self {
        Self {
            to,
            reviewer: reviewer.into(),
            notes,
            at,
        }
    }
}

/// Check whether a transition from `from` to `to` is legal.
pub fn can_transition(from: EventStatus, to: EventStatus) -> bool {
    catalog::legal_transitions(from).contains(&to)
}

/// Validate a transition, failing with [`CoreError::IllegalTransition`].
///
/// Leaving a terminal state always fails; there is no "closest legal" fallback.
pub fn validate_transition(from: EventStatus, to: EventStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::IllegalTransition { from, to })
    }
}

/// Apply `change` to `event`, returning the updated copy.
///
/// - Terminal targets need a non-blank reviewer and stamp `reviewed_at`.
/// - `under-review` records the reviewer (when given) but not `reviewed_at`.
/// - Notes are stored exactly as given; blank notes count as absent and keep
///   earlier notes.
pub fn apply_transition(
    event: &HazardEvent,
    change: &StatusChange,
) -> Result<HazardEvent, CoreError> {
    validate_transition(event.status, change.to)?;

    let reviewer = change.reviewer.trim();
    if change.to.is_terminal() && reviewer.is_empty() {
        return Err(CoreError::Validation(format!(
            "A reviewer identity is required to mark an event {}",
            change.to
        )));
    }

    let notes = change
        .notes
        .as_deref()
        .filter(|n| !n.trim().is_empty());
    if let Some(n) = notes {
        if n.chars().count() > MAX_REVIEW_NOTES_LENGTH {
            return Err(CoreError::Validation(format!(
                "Review notes exceed maximum length of {MAX_REVIEW_NOTES_LENGTH} characters"
            )));
        }
    }

    let mut updated = event.clone();
    updated.status = change.to;
    if !reviewer.is_empty() {
        updated.reviewed_by = Some(reviewer.to_string());
    }
    if change.to.is_terminal() {
        updated.reviewed_at = Some(change.at);
    }
    if let Some(n) = notes {
        updated.review_notes = Some(n.to_string());
    }

    Ok(updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
