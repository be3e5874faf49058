//! Alert-content enrichment.
//!
//! Turns a triggered alert's raw coordinates and distance into readable text
//! through pluggable capabilities, falling back to fixed templates whenever a
//! capability fails.

pub mod capabilities;
pub mod pipeline;
