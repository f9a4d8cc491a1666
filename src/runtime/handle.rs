use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    core::store::{ForumSnapshot, ForumStore},
    event::ForumEvent,
    post::{Answer, Question, Thread},
    stats::aggregator::{StatisticsAggregator, StatsSnapshot},
    types::{EventKind, QuestionId},
};

/// Errors returned by [`ForumHandle`] calls.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The forum task has shut down.
    #[error("forum task is no longer running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_forum`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before it lags.
    pub event_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_queue_bound: 1024,
        }
    }
}

/// Cloneable async front end to a forum owned by one task.
///
/// The task applies commands one at a time, so an append, its event
/// dispatch and the statistics update complete before the next command
/// is read.
#[derive(Clone)]
pub struct ForumHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ForumEvent>,
}

enum Command {
    AddQuestion {
        author: String,
        content: String,
        resp: oneshot::Sender<Question>,
    },
    AddAnswer {
        question_id: QuestionId,
        author: String,
        content: String,
        resp: oneshot::Sender<Answer>,
    },
    Questions {
        resp: oneshot::Sender<Vec<Question>>,
    },
    QuestionsByUser {
        user: String,
        resp: oneshot::Sender<Vec<Question>>,
    },
    AnswersByQuestion {
        question_id: QuestionId,
        resp: oneshot::Sender<Vec<Answer>>,
    },
    QuestionById {
        question_id: QuestionId,
        resp: oneshot::Sender<Option<Question>>,
    },
    QuestionWithAnswers {
        question_id: QuestionId,
        resp: oneshot::Sender<Option<Thread>>,
    },
    Stats {
        resp: oneshot::Sender<StatsSnapshot>,
    },
    Snapshot {
        resp: oneshot::Sender<ForumSnapshot>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `store` and `stats` onto a new task and returns a handle to it.
///
/// `stats` should have been built against `store`. Must be called from
/// within a tokio runtime.
pub fn spawn_forum(
    mut store: ForumStore,
    stats: StatisticsAggregator,
    config: RuntimeConfig,
) -> ForumHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ForumEvent>(config.event_queue_bound);

    for kind in [EventKind::QuestionAdded, EventKind::AnswerAdded] {
        let tx = events_tx.clone();
        store.subscribe(kind, move |_store: &ForumStore, event: &ForumEvent| {
            let _ = tx.send(event.clone());
        });
    }

    tokio::spawn(async move {
        info!(
            questions = store.question_count(),
            answers = store.answer_count(),
            "forum task started"
        );
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut store, &stats) {
                break;
            }
        }
        info!("forum task stopped");
    });

    ForumHandle { cmd_tx, events_tx }
}

impl ForumHandle {
    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ForumEvent> {
        self.events_tx.subscribe()
    }

    pub async fn add_question(
        &self,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Question, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::AddQuestion {
            author: author.into(),
            content: content.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn add_answer(
        &self,
        question_id: impl Into<QuestionId>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Answer, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::AddAnswer {
            question_id: question_id.into(),
            author: author.into(),
            content: content.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn questions(&self) -> Result<Vec<Question>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Questions { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn questions_by_user(&self, user: impl Into<String>) -> Result<Vec<Question>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::QuestionsByUser {
            user: user.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn answers_by_question(
        &self,
        question_id: impl Into<QuestionId>,
    ) -> Result<Vec<Answer>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::AnswersByQuestion {
            question_id: question_id.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// `Ok(None)` when no question carries `question_id`.
    pub async fn question_by_id(
        &self,
        question_id: impl Into<QuestionId>,
    ) -> Result<Option<Question>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::QuestionById {
            question_id: question_id.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn question_with_answers(
        &self,
        question_id: impl Into<QuestionId>,
    ) -> Result<Option<Thread>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::QuestionWithAnswers {
            question_id: question_id.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn stats(&self) -> Result<StatsSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Stats { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn snapshot(&self) -> Result<ForumSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the task after every earlier command has been applied.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(cmd: Command, store: &mut ForumStore, stats: &StatisticsAggregator) -> bool {
    match cmd {
        Command::AddQuestion {
            author,
            content,
            resp,
        } => {
            let _ = resp.send(store.add_question(author, content));
        }
        Command::AddAnswer {
            question_id,
            author,
            content,
            resp,
        } => {
            let _ = resp.send(store.add_answer(question_id, author, content));
        }
        Command::Questions { resp } => {
            let _ = resp.send(store.questions().to_vec());
        }
        Command::QuestionsByUser { user, resp } => {
            let _ = resp.send(store.questions_by_user(&user).into_iter().cloned().collect());
        }
        Command::AnswersByQuestion { question_id, resp } => {
            let _ = resp.send(
                store
                    .answers_by_question(&question_id)
                    .into_iter()
                    .cloned()
                    .collect(),
            );
        }
        Command::QuestionById { question_id, resp } => {
            let _ = resp.send(store.question_by_id(&question_id).cloned());
        }
        Command::QuestionWithAnswers { question_id, resp } => {
            let _ = resp.send(store.question_with_answers(&question_id));
        }
        Command::Stats { resp } => {
            let _ = resp.send(stats.snapshot());
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(store.export_snapshot());
        }
        Command::Shutdown { resp } => {
            debug!("shutdown requested");
            let _ = resp.send(());
            return true;
        }
    }

    false
}
