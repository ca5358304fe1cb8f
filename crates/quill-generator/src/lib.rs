//! # quill-generator
//!
//! LLM-powered generation for Quill.
//!
//! ## Features
//!
//! - Structured outline generation through llm-toolkit agents
//! - Web research over DuckDuckGo and Wikipedia
//! - Section drafting with research indexing, planning and context threading
//! - Article assembly with an optional editing pass
//!
//! ## Example
//!
//! ```no_run
//! use quill_core::{Session, Subtopic, SubtopicList};
//! use quill_generator::{ArticleAssembler, DraftingPipeline, LlmGenerator, WebResearcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let generator = Arc::new(LlmGenerator::new());
//!     let pipeline = DraftingPipeline::new(generator.clone())
//!         .with_researcher(Arc::new(WebResearcher::new()?));
//!
//!     let mut session = Session::new("Containers", ["focus on Linux"]);
//!     session.subtopics = SubtopicList::new(vec![
//!         Subtopic::new("Namespaces", "How the kernel isolates processes"),
//!     ]);
//!
//!     let sections = pipeline.draft(&session).await?;
//!     let article = ArticleAssembler::new(generator)
//!         .polish(&session.topic, &sections)
//!         .await?;
//!
//!     println!("{}", article);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod assembler;
pub mod drafting;
pub mod generator;
pub mod prompts;
pub mod research;

// Re-exports
pub use agents::{OutlineAgent, OutlineResponse, SubtopicEntry, TextResponse, WriterAgent};
pub use assembler::ArticleAssembler;
pub use drafting::{DraftingPipeline, GenerationOptions};
pub use generator::LlmGenerator;
pub use research::{SectionErrorPolicy, WebResearcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
