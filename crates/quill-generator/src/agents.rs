//! Agent definitions for quill-generator
//!
//! This module contains Agent trait implementations using llm-toolkit's Agent derive macro.
//! Agents are kept in a separate module to avoid conflicts with the Result<T> type alias.

use llm_toolkit::{agent, type_marker, ToPrompt};
use quill_core::{Subtopic, SubtopicList};
use serde::{Deserialize, Serialize};

// ============================================================================
// Outline
// ============================================================================

/// One subtopic of the article outline
#[derive(Serialize, Deserialize, Debug, Clone, ToPrompt)]
#[prompt(mode = "full")]
pub struct SubtopicEntry {
    /// Short title of the subtopic (a few words, no numbering)
    pub title: String,

    /// Detailed description (at least 2-3 sentences) of what the section must contain
    /// and how to write it. Another editor writes the section from this text alone.
    pub description: String,
}

/// Structured response for outline generation from LLM
///
/// The entries are ordered so that they unfold the topic from the basics to the
/// advanced material. The last entry is always the further-study recommendations.
#[type_marker]
#[derive(Serialize, Deserialize, Debug, Clone, ToPrompt)]
#[prompt(mode = "full")]
pub struct OutlineResponse {
    /// Ordered list of subtopics for the article
    pub sections: Vec<SubtopicEntry>,
}

impl From<OutlineResponse> for SubtopicList {
    fn from(response: OutlineResponse) -> Self {
        response
            .sections
            .into_iter()
            .map(|entry| Subtopic::new(entry.title, entry.description))
            .collect::<Vec<_>>()
            .into()
    }
}

/// Agent for building and refining the list of article subtopics
#[agent(
    expertise = r#"You are an experienced technical editor who designs the structure of articles.

Your task is to:
1. Read the article topic, the previous list of subtopics and the user's wishes
2. Decide whether the request is a broad research article or a specific factual question
3. Produce an ordered list of subtopics that follows the user's wishes
4. Give every subtopic a short title and a detailed description another editor can write from
5. Finish with the further-study subtopic requested in the input

Output a single, valid JSON object with the structure defined by the `OutlineResponse` type. Do not include any other text or explanations outside of the JSON object."#,
    output = "OutlineResponse",
    backend = "claude"
)]
pub struct OutlineAgent;

// ============================================================================
// Free text
// ============================================================================

/// Structured response for free-form text generation
#[type_marker]
#[derive(Serialize, Deserialize, Debug, Clone, ToPrompt)]
#[prompt(mode = "full")]
pub struct TextResponse {
    /// The requested text exactly as it should be used, formatted as Markdown
    /// where the instructions ask for formatting
    pub text: String,
}

/// Agent for section plans, writer roles, section drafts and editing passes
#[agent(
    expertise = r#"You are a versatile technical writer and editor.

You follow the instructions in the input exactly. Depending on the request you:
- plan a section of an article as a structured list of key points
- name the professional role best suited to author an article
- write a complete article section in Markdown, using Mermaid blocks for diagrams
- edit an assembled article, removing repetition while keeping its structure

Put the complete result into the `text` field. Output a single, valid JSON object with the structure defined by the `TextResponse` type. Do not include any other text or explanations outside of the JSON object."#,
    output = "TextResponse",
    backend = "claude"
)]
pub struct WriterAgent;
