//! Application state

use quill_core::{Generator, Researcher};
use quill_generator::{LlmGenerator, WebResearcher};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// LLM-powered generator
    pub generator: Arc<dyn Generator>,
    /// Web researcher for the drafting pipeline
    pub researcher: Arc<dyn Researcher>,
}

impl AppState {
    /// Create a new AppState
    pub fn new() -> anyhow::Result<Self> {
        let generator = LlmGenerator::new();
        let researcher = WebResearcher::new()?;

        Ok(Self {
            generator: Arc::new(generator),
            researcher: Arc::new(researcher),
        })
    }
}
