use std::sync::{
    Arc, Weak,
    atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    core::store::ForumStore,
    event::ForumEvent,
    post::Answer,
    types::{EventKind, SubscriptionId},
};

/// Point-in-time copy of the aggregator's counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Questions seen.
    pub total_questions: u64,
    /// Answers seen.
    pub total_answers: u64,
    /// Questions with no recorded answer.
    pub unanswered_questions: u64,
    /// Distinct question ids with at least one answer.
    pub questions_with_answers: u64,
    /// `total_answers / total_questions`, or 0.0 with no questions.
    pub average_answers_per_question: f64,
}

#[derive(Debug, Default)]
struct Tally {
    total_questions: AtomicU64,
    total_answers: AtomicU64,
    questions_with_answers: AtomicU64,
}

impl Tally {
    fn apply(&self, store: &ForumStore, event: &ForumEvent) {
        match event {
            ForumEvent::QuestionAdded { .. } => {
                self.total_questions.fetch_add(1, Ordering::Relaxed);
            }
            ForumEvent::AnswerAdded { answer } => {
                self.total_answers.fetch_add(1, Ordering::Relaxed);
                // The answer is already appended, so a count of one means
                // this is the first answer for its question id.
                if store.answer_count_for(&answer.question_id) == 1 {
                    self.record_first_answer(answer);
                }
            }
        }
    }

    fn record_first_answer(&self, answer: &Answer) {
        let answered = self.questions_with_answers.fetch_add(1, Ordering::Relaxed) + 1;
        if answered > Self::load(&self.total_questions) {
            warn!(
                question_id = %answer.question_id,
                answer_id = %answer.id,
                answered,
                "more answered ids than questions; unanswered count held at zero"
            );
        }
    }

    // max(0, questions - answered ids), independent of call order.
    fn unanswered(&self) -> u64 {
        Self::load(&self.total_questions).saturating_sub(Self::load(&self.questions_with_answers))
    }

    fn load(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

/// Running forum statistics maintained from store events.
///
/// Built with [`StatisticsAggregator::new`], which subscribes to both event
/// kinds. Counters are updated inside the store's mutating call, so they are
/// consistent with the store as soon as `add_question`/`add_answer` return.
///
/// The aggregator keeps no reference to the store: the store lends itself to
/// the handler for the one per-question answer count it needs. After the
/// aggregator is dropped its handlers stay registered but do nothing; call
/// [`StatisticsAggregator::detach`] to remove them.
#[derive(Debug)]
pub struct StatisticsAggregator {
    tally: Arc<Tally>,
    subscriptions: [SubscriptionId; 2],
}

impl StatisticsAggregator {
    /// Creates zeroed counters and subscribes them to `store`.
    pub fn new(store: &mut ForumStore) -> Self {
        let tally = Arc::new(Tally::default());
        let on_question = store.subscribe(EventKind::QuestionAdded, handler(Arc::downgrade(&tally)));
        let on_answer = store.subscribe(EventKind::AnswerAdded, handler(Arc::downgrade(&tally)));
        Self {
            tally,
            subscriptions: [on_question, on_answer],
        }
    }

    /// Unregisters both handlers from `store`.
    ///
    /// Counters keep their last values.
    pub fn detach(&self, store: &mut ForumStore) {
        for id in self.subscriptions {
            store.unsubscribe(id);
        }
    }

    pub fn total_questions(&self) -> u64 {
        Tally::load(&self.tally.total_questions)
    }

    pub fn total_answers(&self) -> u64 {
        Tally::load(&self.tally.total_answers)
    }

    /// Questions minus answered question ids, floored at zero.
    pub fn unanswered_questions(&self) -> u64 {
        self.tally.unanswered()
    }

    pub fn questions_with_answers(&self) -> u64 {
        Tally::load(&self.tally.questions_with_answers)
    }

    /// Mean answers per question; 0.0 when there are no questions.
    pub fn average_answers_per_question(&self) -> f64 {
        let questions = self.total_questions();
        if questions == 0 {
            return 0.0;
        }
        self.total_answers() as f64 / questions as f64
    }

    /// Copies the counters and the derived average.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_questions: self.total_questions(),
            total_answers: self.total_answers(),
            unanswered_questions: self.unanswered_questions(),
            questions_with_answers: self.questions_with_answers(),
            average_answers_per_question: self.average_answers_per_question(),
        }
    }
}

fn handler(tally: Weak<Tally>) -> impl FnMut(&ForumStore, &ForumEvent) + Send + 'static {
    move |store: &ForumStore, event: &ForumEvent| {
        if let Some(tally) = tally.upgrade() {
            tally.apply(store, event);
        }
    }
}
