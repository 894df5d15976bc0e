//! Collection of standings across regions.
//!
//! This module ties resolution, fetching and parsing together into the
//! document that gets written out.

pub mod aggregator;

pub use aggregator::*;
