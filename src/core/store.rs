use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    event::ForumEvent,
    post::{Answer, Question, Thread},
    types::{EventKind, QuestionId, SubscriptionId},
};

use super::ids::{IdGenerator, SequentialIds};

/// Callback registered for one [`EventKind`].
///
/// The store lends itself to the handler after the append, so the new record
/// is already visible through every query method.
pub type Handler = Box<dyn FnMut(&ForumStore, &ForumEvent) + Send>;

/// Plain-data copy of both collections in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumSnapshot {
    /// All questions, oldest first.
    pub questions: Vec<Question>,
    /// All answers, oldest first.
    pub answers: Vec<Answer>,
}

struct Subscription {
    id: SubscriptionId,
    handler: Handler,
}

/// Owns the canonical question and answer collections.
///
/// Records are append-only. Every append publishes a [`ForumEvent`] to the
/// handlers registered for its kind, in registration order, before the
/// mutating call returns.
pub struct ForumStore {
    questions: Vec<Question>,
    answers: Vec<Answer>,
    question_pos: HashMap<QuestionId, usize>,
    by_author: HashMap<String, Vec<usize>>,
    by_question: HashMap<QuestionId, Vec<usize>>,
    question_ids: Box<dyn IdGenerator>,
    answer_ids: Box<dyn IdGenerator>,
    handlers: HashMap<EventKind, Vec<Subscription>>,
    next_subscription: u64,
}

impl Default for ForumStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ForumStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForumStore")
            .field("questions", &self.questions.len())
            .field("answers", &self.answers.len())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl ForumStore {
    /// Creates an empty store issuing `Q1, Q2, ...` and `A1, A2, ...`.
    pub fn new() -> Self {
        Self::with_id_generators(
            Box::new(SequentialIds::questions()),
            Box::new(SequentialIds::answers()),
        )
    }

    /// Creates an empty store with caller-supplied identifier policies.
    pub fn with_id_generators(
        question_ids: Box<dyn IdGenerator>,
        answer_ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            questions: Vec::new(),
            answers: Vec::new(),
            question_pos: HashMap::new(),
            by_author: HashMap::new(),
            by_question: HashMap::new(),
            question_ids,
            answer_ids,
            handlers: HashMap::new(),
            next_subscription: 1,
        }
    }

    /// Appends a question and publishes [`ForumEvent::QuestionAdded`].
    pub fn add_question(&mut self, author: impl Into<String>, content: impl Into<String>) -> Question {
        let question = Question {
            id: self.question_ids.next_id(),
            author: author.into(),
            content: content.into(),
        };

        let idx = self.questions.len();
        self.question_pos.entry(question.id.clone()).or_insert(idx);
        self.by_author
            .entry(question.author.clone())
            .or_default()
            .push(idx);
        self.questions.push(question.clone());
        debug!(id = %question.id, author = %question.author, "question added");

        self.publish(ForumEvent::QuestionAdded {
            question: question.clone(),
        });
        question
    }

    /// Appends an answer and publishes [`ForumEvent::AnswerAdded`].
    ///
    /// `question_id` is stored as given, whether or not such a question exists.
    pub fn add_answer(
        &mut self,
        question_id: impl Into<QuestionId>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Answer {
        let answer = Answer {
            id: self.answer_ids.next_id(),
            question_id: question_id.into(),
            author: author.into(),
            content: content.into(),
        };

        let idx = self.answers.len();
        self.by_question
            .entry(answer.question_id.clone())
            .or_default()
            .push(idx);
        self.answers.push(answer.clone());
        debug!(id = %answer.id, question_id = %answer.question_id, "answer added");

        self.publish(ForumEvent::AnswerAdded {
            answer: answer.clone(),
        });
        answer
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Questions whose author equals `user` exactly, oldest first.
    pub fn questions_by_user(&self, user: &str) -> Vec<&Question> {
        self.by_author
            .get(user)
            .into_iter()
            .flat_map(|idxs| idxs.iter())
            .filter_map(|idx| self.questions.get(*idx))
            .collect()
    }

    /// Answers referencing `question_id`, oldest first. Empty when none.
    pub fn answers_by_question(&self, question_id: &str) -> Vec<&Answer> {
        self.by_question
            .get(question_id)
            .into_iter()
            .flat_map(|idxs| idxs.iter())
            .filter_map(|idx| self.answers.get(*idx))
            .collect()
    }

    pub fn answer_count_for(&self, question_id: &str) -> usize {
        self.by_question.get(question_id).map_or(0, Vec::len)
    }

    /// First question carrying `question_id`, or `None`.
    pub fn question_by_id(&self, question_id: &str) -> Option<&Question> {
        self.question_pos
            .get(question_id)
            .and_then(|idx| self.questions.get(*idx))
    }

    /// The question with its answers, or `None` if the question is unknown.
    pub fn question_with_answers(&self, question_id: &str) -> Option<Thread> {
        let question = self.question_by_id(question_id)?.clone();
        let answers = self
            .answers_by_question(question_id)
            .into_iter()
            .cloned()
            .collect();
        Some(Thread { question, answers })
    }

    pub fn export_snapshot(&self) -> ForumSnapshot {
        ForumSnapshot {
            questions: self.questions.clone(),
            answers: self.answers.clone(),
        }
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// Handlers for the same kind run in registration order.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&ForumStore, &ForumEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.handlers.entry(kind).or_default().push(Subscription {
            id,
            handler: Box::new(handler),
        });
        debug!(?kind, subscription = id.0, "handler subscribed");
        id
    }

    /// Removes a handler. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for subs in self.handlers.values_mut() {
            let before = subs.len();
            subs.retain(|s| s.id != id);
            removed |= subs.len() != before;
        }
        removed
    }

    pub fn subscription_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    fn publish(&mut self, event: ForumEvent) {
        let kind = event.kind();
        // Handlers only receive `&ForumStore`, so the table cannot change
        // while it is checked out.
        let Some(mut subs) = self.handlers.remove(&kind) else {
            return;
        };
        for sub in subs.iter_mut() {
            (sub.handler)(&*self, &event);
        }
        self.handlers.insert(kind, subs);
    }
}
