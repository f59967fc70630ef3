/// Opaque, immutable identifier of a stored hazard event.
pub type EventId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Key scoping read/unread state to one consumer view.
pub type SessionKey = String;
