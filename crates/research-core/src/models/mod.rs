//! Data models for research results.
//!
//! Records are parsed from a single upstream item. Stats are derived per
//! call. Result types are what the orchestration layer caches and returns;
//! their field names are the on-disk contract, so every field decodes with a
//! default when missing.

mod records;
mod reddit;
mod results;
mod stats;

pub use records::*;
pub use reddit::*;
pub use results::*;
pub use stats::*;
