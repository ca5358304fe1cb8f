//! # quill-core
//!
//! Core library for Quill article outlining.
//!
//! ## Features
//!
//! - Resumable outline refinement workflow with explicit checkpoints
//! - Append-only preference history with exact-duplicate suppression
//! - Capability traits for text generation and research lookups
//! - In-memory full-text research index (SQLite FTS5)
//!
//! ## Example
//!
//! ```no_run
//! use quill_core::{Generator, OutlineWorkflow, Step};
//! use std::sync::Arc;
//!
//! async fn refine(generator: Arc<dyn Generator>) -> quill_core::Result<()> {
//!     let workflow = OutlineWorkflow::new(generator);
//!
//!     let id = workflow.open("Containers", Vec::<String>::new()).await?;
//!     workflow.advance(id).await?;
//!     workflow.resume(id, "add a section on security").await?;
//!
//!     let step = workflow.resume(id, "done").await?;
//!
//!     if let Step::Done { subtopics } = step {
//!         println!("{} subtopics", subtopics.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod capability;
pub mod error;
pub mod index;
pub mod outline;
pub mod prompt;
pub mod session;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use capability::{Generator, Researcher};
pub use error::{Error, Result};
pub use index::{IndexedPassage, RecallOptions, ResearchIndex};
pub use outline::{OutlineObserver, OutlineOptions, OutlineWorkflow, TracingObserver};
pub use session::{Checkpoint, Node, Session, SessionId, Step};
pub use storage::{CheckpointStore, MemoryCheckpointStore};
pub use types::{
    PreferenceLog, Subtopic, SubtopicList, FURTHER_STUDY_TITLE, NO_SECTIONS, NO_WISHES,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
