//! Output generation modules for the JSON and CSV exports.
//!
//! Both exports carry the same leader records:
//!
//! - [`json`]: one object keyed by country code (country order preserved),
//!   each value an array of full leader records
//! - [`csv`]: a flat table, header row derived from the leader field order,
//!   one row per leader
//!
//! The [`crate::repository::LeaderRepository`] builds the data; these
//! modules only write files and classify their failures.

pub mod csv;
pub mod json;
