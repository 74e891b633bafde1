//! Market analytics over the job store.
//!
//! The aggregation functions are stateless: each takes the selector of the
//! caller's read transaction and re-scans the data it needs.

pub mod aggregator;
pub mod stats;
pub mod summary;

pub use aggregator::*;
pub use summary::market_summary;
