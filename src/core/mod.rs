//! In-memory authoritative store and identifier generation.

/// Identifier generators injected into the store.
pub mod ids;
/// Authoritative question/answer store with synchronous event dispatch.
pub mod store;
