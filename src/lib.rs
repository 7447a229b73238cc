//! plateq: plating shop quoting toolkit
//!
//! Estimates surface-prep labor, rack capacity and plating material cost
//! for electroplating quotes, with quotes and rate tables kept as plain
//! YAML files.

pub mod cli;
pub mod core;
pub mod entities;
