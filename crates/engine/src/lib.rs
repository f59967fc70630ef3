//! Stateful services of the hazard alert engine.
//!
//! - [`store`]: the [`EventStore`] contract and its in-memory implementation.
//! - [`read_state`]: per-session read/unread tracking.
//! - [`feed`]: the synthetic feed generator, its producer seam and lifecycle.
//! - [`service`]: [`AlertService`], the facade every consumer talks to.

pub mod config;
pub mod demo;
pub mod feed;
pub mod read_state;
pub mod service;
pub mod store;

pub use config::EngineConfig;
pub use feed::{FeedController, FeedStatus, ReportSource, SyntheticSource};
pub use read_state::ReadStateTracker;
pub use service::{AlertService, EventQuery, QueriedEvent};
pub use store::{EventStore, InMemoryEventStore, Snapshot};
