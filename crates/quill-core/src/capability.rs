//! Interfaces to the external generation and research capabilities

use crate::{Result, SubtopicList};
use async_trait::async_trait;

/// Text generation backed by a language model
///
/// Implementations report provider failures and schema-invalid outlines as
/// [`Error::Generation`](crate::Error::Generation).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an outline constrained to the subtopic-list schema
    async fn generate_outline(&self, prompt: &str) -> Result<SubtopicList>;

    /// Generate free text
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Lookup tools used while researching a subtopic
///
/// Both methods may return empty text when nothing was found and report
/// failures as [`Error::Search`](crate::Error::Search).
#[async_trait]
pub trait Researcher: Send + Sync {
    /// Web search
    async fn search(&self, query: &str) -> Result<String>;

    /// Encyclopedia lookup
    async fn lookup(&self, query: &str) -> Result<String>;
}
