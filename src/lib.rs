//! In-memory question/answer forum with incrementally maintained statistics.
//!
//! # Examples
//!
//! Synchronous usage with [`core::store::ForumStore`]:
//! ```
//! use forumstat::{core::store::ForumStore, stats::aggregator::StatisticsAggregator};
//!
//! let mut store = ForumStore::new();
//! let stats = StatisticsAggregator::new(&mut store);
//!
//! let q = store.add_question("user1", "How do lifetimes work?");
//! store.add_answer(q.id.as_str(), "user2", "Read the book.");
//!
//! assert_eq!(q.id, "Q1");
//! assert_eq!(stats.total_answers(), 1);
//! assert_eq!(stats.unanswered_questions(), 0);
//! assert!(store.question_by_id("Q9").is_none());
//! ```
//!
//! Runtime usage from async code:
//! ```no_run
//! use forumstat::{
//!     core::store::ForumStore,
//!     runtime::handle::{spawn_forum, RuntimeConfig},
//!     stats::aggregator::StatisticsAggregator,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut store = ForumStore::new();
//! let stats = StatisticsAggregator::new(&mut store);
//! let handle = spawn_forum(store, stats, RuntimeConfig::default());
//! let q = handle.add_question("user1", "Question1").await.expect("add question");
//! handle.add_answer(q.id, "user3", "Answer1").await.expect("add answer");
//! let snapshot = handle.stats().await.expect("stats");
//! assert_eq!(snapshot.questions_with_answers, 1);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Authoritative store and identifier generators.
pub mod core;
/// Events published on every append.
pub mod event;
/// Question, answer and thread records.
pub mod post;
/// Single-writer runtime handle.
pub mod runtime;
/// Event-driven statistics.
pub mod stats;
/// Shared primitive types and enums.
pub mod types;
