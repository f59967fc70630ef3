//! Domain crate for the hazard alert engine.
//!
//! Holds everything that is pure logic with zero internal deps: the event
//! catalog, the `HazardEvent` model and report validation, the review state
//! machine, and the filter/query layer shared by the live feed and the map.

pub mod catalog;
pub mod error;
pub mod hazard;
pub mod query;
pub mod review;
pub mod types;
