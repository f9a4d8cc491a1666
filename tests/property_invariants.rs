use std::collections::BTreeSet;

use proptest::prelude::*;

use forumstat::{
    core::store::ForumStore,
    post::{Answer, Question},
    stats::aggregator::StatisticsAggregator,
};

#[derive(Debug, Clone)]
enum Action {
    Ask { user_idx: u8 },
    Answer { target: u8, user_idx: u8 },
    AnswerForeign { tag: u8 },
    AnswerAhead { ahead: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..6).prop_map(|user_idx| Action::Ask { user_idx }),
        (0u8..32, 0u8..6).prop_map(|(target, user_idx)| Action::Answer { target, user_idx }),
        (0u8..4).prop_map(|tag| Action::AnswerForeign { tag }),
        (0u8..3).prop_map(|ahead| Action::AnswerAhead { ahead }),
    ]
}

fn full_scan_by_user<'a>(store: &'a ForumStore, user: &str) -> Vec<&'a Question> {
    store.questions().iter().filter(|q| q.author == user).collect()
}

fn full_scan_by_question<'a>(store: &'a ForumStore, question_id: &str) -> Vec<&'a Answer> {
    store
        .answers()
        .iter()
        .filter(|a| a.question_id == question_id)
        .collect()
}

fn replay(actions: &[Action]) -> (ForumStore, StatisticsAggregator) {
    let mut store = ForumStore::new();
    let stats = StatisticsAggregator::new(&mut store);
    apply_all(&mut store, actions, |_, _| Ok(())).expect("replay");
    (store, stats)
}

fn apply_all(
    store: &mut ForumStore,
    actions: &[Action],
    mut check: impl FnMut(&ForumStore, usize) -> Result<(), TestCaseError>,
) -> Result<(), TestCaseError> {
    for (step, action) in actions.iter().enumerate() {
        match action {
            Action::Ask { user_idx } => {
                store.add_question(format!("user{user_idx}"), format!("question {step}"));
            }
            Action::Answer { target, user_idx } => {
                if store.question_count() == 0 {
                    continue;
                }
                let idx = usize::from(*target) % store.question_count();
                let question_id = store.questions()[idx].id.clone();
                store.add_answer(question_id, format!("user{user_idx}"), format!("answer {step}"));
            }
            Action::AnswerForeign { tag } => {
                store.add_answer(format!("X{tag}"), "user0", format!("answer {step}"));
            }
            Action::AnswerAhead { ahead } => {
                // Names a question id the store has not issued yet.
                let question_id = format!("Q{}", store.question_count() + 1 + usize::from(*ahead));
                store.add_answer(question_id, "user0", format!("answer {step}"));
            }
        }
        check(&*store, step)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn counters_match_full_rescan_after_every_step(actions in prop::collection::vec(action_strategy(), 1..200)) {
        let mut store = ForumStore::new();
        let stats = StatisticsAggregator::new(&mut store);

        apply_all(&mut store, &actions, |store, _| {
            let answered: BTreeSet<&str> = store.answers().iter().map(|a| a.question_id.as_str()).collect();
            let n = store.questions().len() as u64;
            let m = store.answers().len() as u64;

            prop_assert_eq!(stats.total_questions(), n);
            prop_assert_eq!(stats.total_answers(), m);
            prop_assert_eq!(stats.questions_with_answers(), answered.len() as u64);
            prop_assert_eq!(stats.unanswered_questions(), n.saturating_sub(answered.len() as u64));
            if n == 0 {
                prop_assert_eq!(stats.average_answers_per_question(), 0.0);
            } else {
                prop_assert_eq!(stats.average_answers_per_question(), m as f64 / n as f64);
            }
            Ok(())
        })?;
    }

    #[test]
    fn indexed_queries_match_full_scans(actions in prop::collection::vec(action_strategy(), 1..200)) {
        let (store, _stats) = replay(&actions);

        for user_idx in 0u8..6 {
            let user = format!("user{user_idx}");
            prop_assert_eq!(store.questions_by_user(&user), full_scan_by_user(&store, &user));
        }

        let mut ids: BTreeSet<String> = store.questions().iter().map(|q| q.id.clone()).collect();
        ids.extend((0u8..4).map(|tag| format!("X{tag}")));
        ids.insert("Q0".to_string());
        for id in &ids {
            prop_assert_eq!(store.answers_by_question(id), full_scan_by_question(&store, id));
            prop_assert_eq!(
                store.question_by_id(id),
                store.questions().iter().find(|q| &q.id == id)
            );
        }
    }

    #[test]
    fn same_sequence_gives_same_counters(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let (first_store, first) = replay(&actions);
        let (second_store, second) = replay(&actions);

        prop_assert_eq!(first.snapshot(), second.snapshot());
        prop_assert_eq!(first_store.export_snapshot(), second_store.export_snapshot());
    }
}
