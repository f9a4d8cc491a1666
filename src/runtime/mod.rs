//! Single-writer async runtime around a store and its aggregator.

/// Handle and command loop implementation.
pub mod handle;
