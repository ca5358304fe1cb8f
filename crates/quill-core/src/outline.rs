//! Interactive outline refinement workflow
//!
//! The workflow is an explicit state machine over [`Node`]. Every transition
//! is written to a [`CheckpointStore`] before the next node runs, and the
//! machine halts at suspension points, handing control back to the caller
//! until [`OutlineWorkflow::resume`] supplies the operator's answer.
//!
//! ```text
//! Generate -> Display -> AwaitFeedback --"done"--> [AwaitSelection] -> Finalize -> End
//!    ^                        |
//!    +------ other text ------+
//! ```

use crate::prompt::outline_prompt;
use crate::storage::{CheckpointStore, MemoryCheckpointStore};
use crate::{
    Checkpoint, Error, Generator, Node, Result, Session, SessionId, Step, SubtopicList,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Literal that ends the refinement loop (compared case-insensitively)
pub const DONE_TOKEN: &str = "done";

/// Prompt exposed while waiting for feedback
pub const FEEDBACK_PROMPT: &str = "Refine the subtopics with more wishes, or type 'done' to accept them";

/// Prompt exposed while waiting for a selection
pub const SELECTION_PROMPT: &str =
    "Numbers of the subtopics to remove, comma separated (0 or empty keeps all)";

/// Receives the outline readouts produced by the workflow
pub trait OutlineObserver: Send + Sync {
    /// Called by the display node with the freshly generated outline
    fn on_display(&self, session_id: SessionId, subtopics: &SubtopicList);

    /// Called once when the session finalizes
    fn on_finalize(&self, session_id: SessionId, session: &Session);
}

/// Observer that writes readouts to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl OutlineObserver for TracingObserver {
    fn on_display(&self, session_id: SessionId, subtopics: &SubtopicList) {
        info!("Current subtopics for session {}:", session_id);
        for line in enumerate_subtopics(subtopics) {
            info!("{}", line);
        }
    }

    fn on_finalize(&self, session_id: SessionId, session: &Session) {
        info!(
            "Finalized session {} with {} subtopics after {} wishes",
            session_id,
            session.subtopics.len(),
            session.preferences.len()
        );
        for line in enumerate_subtopics(&session.subtopics) {
            info!("{}", line);
        }
    }
}

/// Render a 1-based enumeration of the outline
pub fn enumerate_subtopics(subtopics: &SubtopicList) -> Vec<String> {
    subtopics
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {}:\n\t{}", i + 1, s.title, s.description))
        .collect()
}

/// Workflow options
#[derive(Debug, Clone, Default)]
pub struct OutlineOptions {
    /// Maximum number of generation rounds; `None` lets the operator iterate freely
    pub max_rounds: Option<u32>,
    /// Ask which subtopics to drop after the operator accepts the outline
    pub review_selection: bool,
}

/// Outline refinement state machine
pub struct OutlineWorkflow {
    generator: Arc<dyn Generator>,
    store: Arc<dyn CheckpointStore>,
    observer: Arc<dyn OutlineObserver>,
    options: OutlineOptions,
}

impl OutlineWorkflow {
    /// Create a workflow with in-memory checkpoints and a tracing observer
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            store: Arc::new(MemoryCheckpointStore::new()),
            observer: Arc::new(TracingObserver),
            options: OutlineOptions::default(),
        }
    }

    /// Use a different checkpoint store
    pub fn with_store(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.store = store;
        self
    }

    /// Use a different observer
    pub fn with_observer(mut self, observer: Arc<dyn OutlineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set workflow options
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the workflow options
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Create a session positioned at the generation node
    ///
    /// Nothing runs until [`advance`](Self::advance) is called.
    pub async fn open<I, S>(&self, topic: impl Into<String>, preferences: I) -> Result<SessionId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let session_id = SessionId::new();
        let session = Session::new(topic, preferences);

        info!(
            "Opening outline session {}: topic={}, {} seed wishes",
            session_id,
            session.topic,
            session.preferences.len()
        );

        self.store
            .save(Checkpoint::new(session_id, session))
            .await?;
        Ok(session_id)
    }

    /// Run the session from its recorded node until it suspends or finalizes
    ///
    /// At a suspension point this only re-surfaces the pending prompt. After a
    /// generation failure the session is still positioned at the generation
    /// node, so calling this again retries it.
    pub async fn advance(&self, session_id: SessionId) -> Result<Step> {
        let checkpoint = self.checkpoint(session_id).await?;
        self.run(checkpoint).await
    }

    /// Feed the operator's answer to a suspended session
    pub async fn resume(&self, session_id: SessionId, value: &str) -> Result<Step> {
        let mut checkpoint = self.checkpoint(session_id).await?;

        match checkpoint.next {
            Node::End => return Err(Error::SessionAlreadyTerminal(session_id)),
            Node::AwaitFeedback => self.apply_feedback(&mut checkpoint, value)?,
            Node::AwaitSelection => self.apply_selection(&mut checkpoint, value)?,
            node => {
                return Err(Error::NotSuspended {
                    session: session_id,
                    node,
                })
            }
        }

        self.store.save(checkpoint.clone()).await?;
        self.run(checkpoint).await
    }

    /// Get the current checkpoint of a session
    pub async fn checkpoint(&self, session_id: SessionId) -> Result<Checkpoint> {
        self.store
            .load(session_id)
            .await?
            .ok_or(Error::SessionNotFound(session_id))
    }

    /// Abandon a session
    ///
    /// No external resources are held across suspensions, so dropping the
    /// checkpoint is all that cancellation requires.
    pub async fn discard(&self, session_id: SessionId) -> Result<bool> {
        info!("Discarding outline session {}", session_id);
        self.store.remove(session_id).await
    }

    async fn run(&self, mut checkpoint: Checkpoint) -> Result<Step> {
        let session_id = checkpoint.session_id;

        loop {
            match checkpoint.next {
                Node::Generate => {
                    let prompt = outline_prompt(&checkpoint.session);
                    info!(
                        "Generating outline for session {} (round {}, {} wishes)",
                        session_id,
                        checkpoint.rounds + 1,
                        checkpoint.session.preferences.len()
                    );

                    let subtopics = self
                        .generator
                        .generate_outline(&prompt)
                        .await
                        .and_then(|list| SubtopicList::validated(list.into_inner()))
                        .map_err(|e| {
                            error!("Outline generation failed for session {}: {}", session_id, e);
                            e
                        })?;

                    debug!("Generated {} subtopics", subtopics.len());
                    checkpoint.session.subtopics = subtopics;
                    checkpoint.rounds += 1;
                    checkpoint.next = Node::Display;
                }
                Node::Display => {
                    self.observer
                        .on_display(session_id, &checkpoint.session.subtopics);
                    checkpoint.next = Node::AwaitFeedback;
                }
                Node::AwaitFeedback => {
                    return Ok(Step::Suspended {
                        prompt: FEEDBACK_PROMPT.to_string(),
                    });
                }
                Node::AwaitSelection => {
                    return Ok(Step::Suspended {
                        prompt: SELECTION_PROMPT.to_string(),
                    });
                }
                Node::Finalize => {
                    self.observer.on_finalize(session_id, &checkpoint.session);
                    checkpoint.next = Node::End;
                    let subtopics = checkpoint.session.subtopics.clone();
                    self.store.save(checkpoint).await?;
                    info!("Outline session {} finalized", session_id);
                    return Ok(Step::Done { subtopics });
                }
                Node::End => return Err(Error::SessionAlreadyTerminal(session_id)),
            }

            self.store.save(checkpoint.clone()).await?;
        }
    }

    fn apply_feedback(&self, checkpoint: &mut Checkpoint, value: &str) -> Result<()> {
        let session_id = checkpoint.session_id;
        let feedback = value.trim();

        if feedback.eq_ignore_ascii_case(DONE_TOKEN) {
            debug!("Operator accepted the outline for session {}", session_id);
            checkpoint.next = if self.options.review_selection {
                Node::AwaitSelection
            } else {
                Node::Finalize
            };
            return Ok(());
        }

        if feedback.is_empty() {
            return Err(Error::InvalidResumeInput {
                session: session_id,
                reason: format!("expected '{}' or additional wishes", DONE_TOKEN),
            });
        }

        if let Some(limit) = self.options.max_rounds {
            if checkpoint.rounds >= limit {
                warn!(
                    "Session {} reached {} rounds, rejecting further wishes",
                    session_id, limit
                );
                return Err(Error::RoundLimitReached {
                    session: session_id,
                    limit,
                });
            }
        }

        if checkpoint.session.preferences.push_unique(value) {
            debug!("Recorded wish for session {}: {}", session_id, value);
        } else {
            debug!("Wish already recorded for session {}: {}", session_id, value);
        }

        checkpoint.next = Node::Generate;
        Ok(())
    }

    fn apply_selection(&self, checkpoint: &mut Checkpoint, value: &str) -> Result<()> {
        let positions = parse_selection(value, checkpoint.session.subtopics.len()).map_err(
            |reason| Error::InvalidResumeInput {
                session: checkpoint.session_id,
                reason,
            },
        )?;

        if !positions.is_empty() {
            debug!(
                "Removing subtopics {:?} from session {}",
                positions, checkpoint.session_id
            );
            checkpoint.session.subtopics =
                checkpoint.session.subtopics.without_positions(&positions);
        }

        checkpoint.next = Node::Finalize;
        Ok(())
    }
}

/// Parse a comma-separated list of 1-based positions
///
/// Empty input or a lone `0` selects nothing.
pub fn parse_selection(input: &str, len: usize) -> std::result::Result<Vec<usize>, String> {
    let input = input.trim();
    if input.is_empty() || input == "0" {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(|part| {
            let part = part.trim();
            let position: usize = part
                .parse()
                .map_err(|_| format!("'{}' is not a subtopic number", part))?;
            if position == 0 || position > len {
                return Err(format!(
                    "subtopic number {} is out of range 1..={}",
                    position, len
                ));
            }
            Ok(position)
        })
        .collect()
}
