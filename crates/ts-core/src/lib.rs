//! # ts-core
//!
//! Core types for tariffstat: the typed observation record, the in-memory
//! panel, calendar quarters and policy eras, and the shared error type.
//!
//! Everything downstream (ingestion, regression, reporting) exchanges these
//! types, so column-name contracts are checked when a value is constructed
//! rather than when a stage first touches a column.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calendar;
pub mod error;
pub mod types;

pub use calendar::{EraBoundary, PolicyDates, Quarter};
pub use error::{Error, Result};
pub use types::{
    Observation, Outcome, Panel, PolicyEra, TreatmentGroup, TreatmentIndicators,
};

/// Crate version, shared by every tariffstat artifact.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
