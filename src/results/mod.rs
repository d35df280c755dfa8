//! Document and result types
//!
//! Defines the hit records returned by both sources and the container that
//! merges them into one ordered listing.

mod container;
mod types;

pub use container::{combine, ResultContainer};
pub use types::*;
