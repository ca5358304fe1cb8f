//! Prompt construction for outline generation

use crate::{Session, FURTHER_STUDY_TITLE};

/// Build the outline generation prompt for the current session state
///
/// The prompt always carries the topic, the full preference log and the
/// previous outline, so each round sees the complete history.
pub fn outline_prompt(session: &Session) -> String {
    format!(
        r#"You are an expert technical editor. Your task is to build the list of subtopics for an article.

# Step 1: classify the request
From the article topic and the user's wishes (if any), decide which kind of request this is:
- Research article: a broad topic that needs comprehensive coverage, an introduction to the field and an explanation of the basic concepts.
- Factual question: a specific question that needs a direct answer, technical details or step-by-step instructions.

# Step 2: build the structure
If the article is a **research article**:
- The reader most likely knows nothing about the subject and needs the knowledge that brings them up to speed.
- Produce 5-8 logically connected subtopics.
- Start with the basic concepts and move gradually to the more advanced ones.
- Focus on the main aspects of the topic; do not drift into narrow subjects.

If the request is a **factual question**:
- Produce 3-5 concrete subtopics that answer the question directly.
- Avoid general introductions and focus on the substance.
- For technical questions include a subtopic with practical examples.
- Do not add an introduction or a conclusion.

# Step 3: further study
Always finish with a final subtopic titled "{further_study}" containing:
- 5-10 related topics or questions for going deeper;
- concrete query strings the reader can use in a search engine;
- pointers to authoritative resources (documentation, books, websites).

# General requirements
- Remove subtopics the user considers unnecessary.
- Add the subtopics proposed in the user's wishes.
- Do NOT duplicate subtopics that already exist.
- Order the subtopics so that they unfold the topic smoothly.
- For every subtopic write a title and a detailed description (at least 2-3 sentences) of what it must contain and how to write it; another editor will write the section from this description alone.
- Use technically precise terminology.

**Article topic:** {topic}
**Previous subtopics:**
{sections}
**User wishes:**
{wishes}

Update the list of subtopics according to the wishes above."#,
        further_study = FURTHER_STUDY_TITLE,
        topic = session.topic,
        sections = session.subtopics.render(),
        wishes = session.preferences.render(),
    )
}
