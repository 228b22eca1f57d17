//! # ts-data
//!
//! Reads per-industry BLS QCEW extracts, labels every row with its industry
//! metadata and derived policy era, and concatenates them into one
//! [`ts_core::Panel`].

#![warn(clippy::all)]

pub mod export;
pub mod ingest;
pub mod qcew;

pub use export::write_panel_csv;
pub use ingest::{
    IndustryInfo, IndustryMapping, LoadOptions, LoadReport, MissingIndustryPolicy, SkippedIndustry,
    load_industry, load_panel, read_industry,
};
