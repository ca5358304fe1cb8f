//! Prompt templates for section drafting and article editing

use quill_core::Subtopic;

/// Heading that separates a subtopic's own findings from related passages
pub const RELATED_HEADING: &str = "### Related information";

/// Build the research findings block for one subtopic
///
/// Empty parts are dropped; the result is empty when nothing was found.
pub fn findings_text(search: &str, lookup: &str) -> String {
    [search.trim(), lookup.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Append related passages recalled from other subtopics to the findings
pub fn enrich_findings(findings: &str, related: &[String]) -> String {
    if related.is_empty() {
        return findings.to_string();
    }

    let related = related.join("\n\n");
    if findings.trim().is_empty() {
        format!("{}\n\n{}", RELATED_HEADING, related)
    } else {
        format!("{}\n\n{}\n\n{}", findings, RELATED_HEADING, related)
    }
}

/// Generate prompt for planning one section
pub fn section_plan_prompt(topic: &str, subtopic: &Subtopic, findings: &str) -> String {
    format!(
        r#"You are a technical editor structuring material for an article.
Using the collected research, write a detailed plan for one subsection: pick out the key points and decide the logical order of presentation. Respect the subtopic description.
The subsection only has to answer its own question, so the plan must contain only that answer. Do not plan an introduction or a conclusion.

**Article topic:** {}
**Subtopic:** {}
**Subtopic description:** {}
**Collected research:**
{}

Write a structured plan for this subtopic."#,
        topic,
        subtopic.title,
        subtopic.description,
        or_none(findings),
    )
}

/// Generate prompt for choosing the author persona
pub fn writer_role_prompt(topic: &str, wishes: &str) -> String {
    format!(
        r#"From the topic and the user's wishes (if any), decide who should be the author of the text.

Answer format:
Job title

Examples:
    Topic: Quicksort algorithm
    Wishes: detailed explanation of how the algorithm works with Python code examples
    Answer: Python developer and university lecturer
    ---
    Topic: Surrealism in digital art
    Wishes: cover the history and the influence
    Answer: Historian of contemporary art
    ---
    Topic: History of the USA in the late 18th century
    Wishes: development of agriculture in the period
    Answer: Historian and lecturer of US history

Now name the role for:
- Topic: {}
- Wishes: {}

Return only the job title, with no additions or other words."#,
        topic, wishes
    )
}

/// Generate prompt for writing one section
///
/// `previous` is the text of the section written just before this one, empty
/// for the first section.
pub fn section_prompt(
    role: &str,
    topic: &str,
    subtopic: &Subtopic,
    plan: &str,
    findings: &str,
    previous: &str,
) -> String {
    format!(
        r#"You are {role}.
Your task is to write one section of an article on the topic and subtopic below. An editor prepared a plan for the section, so follow these instructions strictly:
- Follow the plan and respect the subtopic description. Both were agreed with the user.
- Explain clearly and step by step, with examples and explanations.
- Take the previous context into account, if given, to avoid repetition and make smooth transitions between topics.
- Use the prepared research data.
- Format the text with Markdown.
- Use Mermaid blocks in Markdown for diagrams.
- Do not add "Introduction" or "Conclusion" subsections; the section only answers its subtopic.
- Always add a recommended reading part with resources that help go deeper into the section's subject: books, links, documentation and good search engine queries.

Goal: make a complex subject understandable and practical.

**Article topic:** {topic}
**Subtopic:** {title}
**Description:** {description}
**Previous context:**
{previous}
**Section plan:**
{plan}
**Research data:**
{findings}

Write the complete text of this section."#,
        role = role.trim(),
        topic = topic,
        title = subtopic.title,
        description = subtopic.description,
        previous = previous,
        plan = plan,
        findings = or_none(findings),
    )
}

/// Generate prompt for the final editing pass over the joined sections
pub fn polish_prompt(topic: &str, sections: &str) -> String {
    format!(
        r#"You are an experienced technical editor. Your task is to turn the sections below into one coherent, well-structured article.
- Remove repeated definitions and phrases.
- Make smooth transitions between the sections.
- Keep the original structure and order of the sections.
- Keep the Markdown formatting and every Mermaid diagram intact.
- Do not add a title heading; it is added separately.

**Article topic:** {}

**Article material:**
{}

Produce the complete edited article."#,
        topic, sections
    )
}

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "none"
    } else {
        text
    }
}
