//! Identifier policies for questions and answers.

use uuid::Uuid;

/// Source of fresh identifiers for one record collection.
///
/// Implementations must never hand out the same string twice for the
/// lifetime of the generator.
pub trait IdGenerator: Send {
    /// Returns the next unused identifier.
    fn next_id(&mut self) -> String;
}

/// Monotonic counter rendered with a type-tag prefix: `Q1`, `Q2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Starts a counter at 1 with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Prefix used for questions.
    pub fn questions() -> Self {
        Self::new("Q")
    }

    /// Prefix used for answers.
    pub fn answers() -> Self {
        Self::new("A")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("{}{n}", self.prefix)
    }
}

/// Random v4 UUID tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
