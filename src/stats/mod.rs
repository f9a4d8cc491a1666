//! Incremental forum statistics.

/// Event-driven aggregator and its snapshot type.
pub mod aggregator;
