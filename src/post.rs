//! Question and answer records.

use serde::{Deserialize, Serialize};

use crate::types::{AnswerId, QuestionId};

/// A question posted to the forum. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Store-assigned identifier.
    pub id: QuestionId,
    /// Posting user.
    pub author: String,
    /// Question body.
    pub content: String,
}

/// An answer to a question. Immutable once stored.
///
/// `question_id` is a plain reference; nothing checks that the question
/// exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Store-assigned identifier.
    pub id: AnswerId,
    /// Question this answer replies to.
    pub question_id: QuestionId,
    /// Posting user.
    pub author: String,
    /// Answer body.
    pub content: String,
}

/// A question together with its answers in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// The question.
    pub question: Question,
    /// Answers to the question, oldest first.
    pub answers: Vec<Answer>,
}

impl Thread {
    /// Returns true when nobody has answered yet.
    pub fn is_unanswered(&self) -> bool {
        self.answers.is_empty()
    }
}
