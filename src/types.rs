//! Shared primitive IDs and event-kind enums.

use serde::{Deserialize, Serialize};

/// Store-assigned question identifier, e.g. `"Q1"`.
pub type QuestionId = String;
/// Store-assigned answer identifier, e.g. `"A1"`.
pub type AnswerId = String;

/// Handle returned by [`crate::core::store::ForumStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Discriminant used to key event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A question was appended.
    QuestionAdded,
    /// An answer was appended.
    AnswerAdded,
}
