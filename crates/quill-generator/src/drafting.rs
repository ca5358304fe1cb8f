//! Section drafting pipeline
//!
//! Turns a finalized outline into section texts in five phases: research,
//! indexing, planning, writer role selection and writing. Every call is
//! awaited before the next one starts and sections are written in order.

use crate::prompts::{
    enrich_findings, findings_text, section_plan_prompt, section_prompt, writer_role_prompt,
};
use crate::research::SectionErrorPolicy;
use quill_core::{
    Generator, RecallOptions, ResearchIndex, Researcher, Result, Session, Subtopic,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drafting options
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Run the research phase
    pub research: bool,
    /// Run the final editing pass over the assembled article
    pub polish: bool,
    /// What to do when a research call fails
    pub on_section_error: SectionErrorPolicy,
    /// Related passages recalled from other subtopics per section
    pub research_hits: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            research: true,
            polish: true,
            on_section_error: SectionErrorPolicy::Skip,
            research_hits: 3,
        }
    }
}

/// Drafting pipeline over the generation and research capabilities
pub struct DraftingPipeline {
    generator: Arc<dyn Generator>,
    researcher: Option<Arc<dyn Researcher>>,
    options: GenerationOptions,
}

impl DraftingPipeline {
    /// Create a pipeline without research
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            researcher: None,
            options: GenerationOptions::default(),
        }
    }

    /// Use a researcher for the research phase
    pub fn with_researcher(mut self, researcher: Arc<dyn Researcher>) -> Self {
        self.researcher = Some(researcher);
        self
    }

    /// Set drafting options
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the drafting options
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Draft one section per subtopic of a finalized session
    ///
    /// The result has the same length and order as `session.subtopics`.
    pub async fn draft(&self, session: &Session) -> Result<Vec<String>> {
        let subtopics = session.subtopics.as_slice();
        if subtopics.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Drafting {} sections for topic: {}",
            subtopics.len(),
            session.topic
        );

        let findings = self.research(&session.topic, subtopics).await?;
        let findings = self.enrich(&session.topic, subtopics, findings).await?;
        let plans = self.plan(&session.topic, subtopics, &findings).await?;

        let role = self
            .generator
            .generate_text(&writer_role_prompt(
                &session.topic,
                &session.preferences.render(),
            ))
            .await?;
        info!("Writer role: {}", role.trim());

        let mut sections: Vec<String> = Vec::with_capacity(subtopics.len());
        for (i, subtopic) in subtopics.iter().enumerate() {
            info!(
                "Writing section {}/{}: {}",
                i + 1,
                subtopics.len(),
                subtopic.title
            );

            let previous = sections.last().map(String::as_str).unwrap_or("");
            let prompt = section_prompt(
                &role,
                &session.topic,
                subtopic,
                &plans[i],
                &findings[i],
                previous,
            );
            let text = self.generator.generate_text(&prompt).await?;
            sections.push(text);
        }

        info!("Drafted {} sections", sections.len());
        Ok(sections)
    }

    async fn research(&self, topic: &str, subtopics: &[Subtopic]) -> Result<Vec<String>> {
        let researcher = match (&self.researcher, self.options.research) {
            (Some(researcher), true) => researcher,
            _ => {
                debug!("Research phase disabled");
                return Ok(vec![String::new(); subtopics.len()]);
            }
        };

        let mut findings = Vec::with_capacity(subtopics.len());
        for subtopic in subtopics {
            let query = format!("{} {}", topic, subtopic.title);
            info!("Researching: {}", query);

            let search = self.tolerate(researcher.search(&query).await, &query)?;
            let lookup = self.tolerate(researcher.lookup(&query).await, &query)?;
            findings.push(findings_text(&search, &lookup));
        }

        Ok(findings)
    }

    fn tolerate(&self, result: Result<String>, query: &str) -> Result<String> {
        match (result, self.options.on_section_error) {
            (Ok(text), _) => Ok(text),
            (Err(e), SectionErrorPolicy::Skip) => {
                warn!("Research failed for '{}', continuing without it: {}", query, e);
                Ok(String::new())
            }
            (Err(e), SectionErrorPolicy::Propagate) => Err(e),
        }
    }

    async fn enrich(
        &self,
        topic: &str,
        subtopics: &[Subtopic],
        findings: Vec<String>,
    ) -> Result<Vec<String>> {
        if self.options.research_hits == 0 || findings.iter().all(|f| f.trim().is_empty()) {
            return Ok(findings);
        }

        let index = ResearchIndex::open().await?;
        for (position, (subtopic, text)) in subtopics.iter().zip(&findings).enumerate() {
            index.add(topic, position, &subtopic.title, text).await?;
        }
        debug!("Indexed {} research passages", index.count().await?);

        let mut enriched = Vec::with_capacity(findings.len());
        for (position, (subtopic, text)) in subtopics.iter().zip(&findings).enumerate() {
            let query = format!("{} {}", topic, subtopic.title);
            let related: Vec<String> = index
                .recall(
                    &query,
                    RecallOptions::new()
                        .exclude_position(position)
                        .limit(self.options.research_hits),
                )
                .await?
                .into_iter()
                .map(|passage| passage.content)
                .collect();

            debug!(
                "Recalled {} related passages for: {}",
                related.len(),
                subtopic.title
            );
            enriched.push(enrich_findings(text, &related));
        }

        index.close().await;
        Ok(enriched)
    }

    async fn plan(
        &self,
        topic: &str,
        subtopics: &[Subtopic],
        findings: &[String],
    ) -> Result<Vec<String>> {
        let mut plans = Vec::with_capacity(subtopics.len());
        for (subtopic, text) in subtopics.iter().zip(findings) {
            debug!("Planning section: {}", subtopic.title);
            let plan = self
                .generator
                .generate_text(&section_plan_prompt(topic, subtopic, text))
                .await?;
            plans.push(plan);
        }
        Ok(plans)
    }
}
