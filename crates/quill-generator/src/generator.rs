//! Generation capability backed by llm-toolkit agents

use crate::agents::{OutlineAgent, WriterAgent};
use async_trait::async_trait;
use llm_toolkit::Agent;
use quill_core::{Error, Generator, Result, SubtopicList};
use tracing::{debug, error, info};

/// Generator that routes prompts to LLM agents
///
/// Outline prompts go to [`OutlineAgent`] and are validated before they are
/// returned; every other prompt goes to [`WriterAgent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LlmGenerator;

impl LlmGenerator {
    /// Create a new LlmGenerator
    ///
    /// # Example
    ///
    /// ```no_run
    /// use quill_core::Generator;
    /// use quill_generator::LlmGenerator;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let generator = LlmGenerator::new();
    ///     let text = generator.generate_text("Name three container runtimes").await?;
    ///     println!("{}", text);
    ///     Ok(())
    /// }
    /// ```
    pub fn new() -> Self {
        info!("Initializing LlmGenerator");
        Self
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate_outline(&self, prompt: &str) -> Result<SubtopicList> {
        debug!("Requesting outline ({} prompt chars)", prompt.len());

        let agent = OutlineAgent::default();

        match agent.execute(prompt.to_string().into()).await {
            Ok(response) => {
                info!("Received outline with {} entries", response.sections.len());
                let list: SubtopicList = response.into();
                SubtopicList::validated(list.into_inner())
            }
            Err(e) => {
                error!("Outline generation failed: {:?}", e);
                Err(Error::Generation(e.to_string()))
            }
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        debug!("Requesting text ({} prompt chars)", prompt.len());

        let agent = WriterAgent::default();

        match agent.execute(prompt.to_string().into()).await {
            Ok(response) => {
                let text = response.text.trim().to_string();
                if text.is_empty() {
                    error!("Text generation returned an empty result");
                    return Err(Error::Generation(
                        "text response was empty".to_string(),
                    ));
                }
                debug!("Received {} chars of text", text.len());
                Ok(text)
            }
            Err(e) => {
                error!("Text generation failed: {:?}", e);
                Err(Error::Generation(e.to_string()))
            }
        }
    }
}
