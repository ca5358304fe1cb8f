//! Article assembly

use crate::prompts::polish_prompt;
use quill_core::{Generator, Result};
use std::sync::Arc;
use tracing::info;

/// Joins drafted sections into the final article
pub struct ArticleAssembler {
    generator: Arc<dyn Generator>,
}

impl ArticleAssembler {
    /// Create a new ArticleAssembler
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Title heading followed by the sections in input order
    pub fn assemble(topic: &str, sections: &[String]) -> String {
        format!("{}{}", heading(topic), sections.join("\n\n"))
    }

    /// Run one editing pass over the joined sections, then add the heading
    pub async fn polish(&self, topic: &str, sections: &[String]) -> Result<String> {
        if sections.is_empty() {
            return Ok(Self::assemble(topic, sections));
        }

        info!("Polishing article of {} sections", sections.len());
        let edited = self
            .generator
            .generate_text(&polish_prompt(topic, &sections.join("\n\n")))
            .await?;

        Ok(format!("{}{}", heading(topic), edited))
    }
}

fn heading(topic: &str) -> String {
    format!("# {}\n\n", topic)
}
