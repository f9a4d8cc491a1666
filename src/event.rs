//! Domain events published by the store.

use serde::{Deserialize, Serialize};

use crate::{
    post::{Answer, Question},
    types::EventKind,
};

/// Immutable notification describing a single append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForumEvent {
    /// A question was appended.
    QuestionAdded {
        /// The stored question.
        question: Question,
    },
    /// An answer was appended.
    AnswerAdded {
        /// The stored answer.
        answer: Answer,
    },
}

impl ForumEvent {
    /// Handler-table key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::QuestionAdded { .. } => EventKind::QuestionAdded,
            Self::AnswerAdded { .. } => EventKind::AnswerAdded,
        }
    }
}
