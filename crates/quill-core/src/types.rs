//! Outline data model: subtopics and the preference log

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered in place of an empty preference log
pub const NO_WISHES: &str = "no additional wishes";

/// Rendered in place of an empty subtopic list
pub const NO_SECTIONS: &str = "no sections";

/// Title of the mandatory closing subtopic
pub const FURTHER_STUDY_TITLE: &str = "Recommendations for further study";

/// One titled unit of article content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    /// Subtopic title
    pub title: String,
    /// What the section should cover, written as guidance for the section writer
    pub description: String,
}

impl Subtopic {
    /// Create a new Subtopic
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this is the closing "further study" entry
    pub fn is_further_study(&self) -> bool {
        self.title.trim().eq_ignore_ascii_case(FURTHER_STUDY_TITLE)
    }
}

impl fmt::Display for Subtopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.description)
    }
}

/// Ordered outline of subtopics
///
/// Each generation round replaces the list wholesale; entries are never
/// edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtopicList(Vec<Subtopic>);

impl SubtopicList {
    /// Create a list from subtopics in article order
    pub fn new(subtopics: Vec<Subtopic>) -> Self {
        Self(subtopics)
    }

    /// Validate a freshly generated list
    ///
    /// A generated outline must contain at least one entry and every entry
    /// must carry a non-blank title.
    pub fn validated(subtopics: Vec<Subtopic>) -> Result<Self> {
        if subtopics.is_empty() {
            return Err(Error::Generation(
                "outline response contained no subtopics".to_string(),
            ));
        }

        if let Some(position) = subtopics.iter().position(|s| s.title.trim().is_empty()) {
            return Err(Error::Generation(format!(
                "outline entry {} has an empty title",
                position + 1
            )));
        }

        Ok(Self(subtopics))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subtopic> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Subtopic] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Subtopic> {
        self.0
    }

    /// Render entries as `"{title}\n{description}"` joined by newlines
    pub fn render(&self) -> String {
        if self.0.is_empty() {
            return NO_SECTIONS.to_string();
        }

        self.0
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Return a copy without the entries at the given 1-based positions
    pub fn without_positions(&self, positions: &[usize]) -> Self {
        Self(
            self.0
                .iter()
                .enumerate()
                .filter(|(i, _)| !positions.contains(&(i + 1)))
                .map(|(_, s)| s.clone())
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a SubtopicList {
    type Item = &'a Subtopic;
    type IntoIter = std::slice::Iter<'a, Subtopic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Subtopic>> for SubtopicList {
    fn from(subtopics: Vec<Subtopic>) -> Self {
        Self(subtopics)
    }
}

/// Append-only history of the user's refinement requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceLog(Vec<String>);

impl PreferenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preference unless the exact same string is already recorded
    ///
    /// Returns `true` when the entry was appended.
    pub fn push_unique(&mut self, preference: impl Into<String>) -> bool {
        let preference = preference.into();
        if self.0.contains(&preference) {
            return false;
        }
        self.0.push(preference);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Render the full log newline-joined, or the "no additional wishes" sentinel
    pub fn render(&self) -> String {
        if self.0.is_empty() {
            NO_WISHES.to_string()
        } else {
            self.0.join("\n")
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PreferenceLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut log = PreferenceLog::new();
        for preference in iter {
            log.push_unique(preference);
        }
        log
    }
}
