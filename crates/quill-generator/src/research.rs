//! Web research capability
//!
//! `search` queries the DuckDuckGo instant answer API, `lookup` queries the
//! Wikipedia search API with plain-text extracts. Neither needs an API key.

use async_trait::async_trait;
use quill_core::{Error, Researcher, Result};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";
const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";

/// What the drafting pipeline does when a research call fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionErrorPolicy {
    /// Log a warning and continue with empty findings
    #[default]
    Skip,
    /// Abort the run with the search error
    Propagate,
}

impl FromStr for SectionErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "propagate" => Ok(Self::Propagate),
            _ => Err(format!(
                "Invalid section error policy: {}. Must be 'skip' or 'propagate'",
                s
            )),
        }
    }
}

impl fmt::Display for SectionErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Propagate => write!(f, "propagate"),
        }
    }
}

/// Researcher that queries public web APIs
#[derive(Debug, Clone)]
pub struct WebResearcher {
    client: reqwest::Client,
    max_results: usize,
}

impl WebResearcher {
    /// Create a researcher returning up to four search results and three articles
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_results: 4,
        })
    }

    /// Set the maximum number of results per call
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    async fn get_json(&self, url: &str, params: &[(&str, &str)], query: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::search(query, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::search(
                query,
                format!("API error {}: {}", status, truncate(&body, 200)),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| Error::search(query, format!("failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Researcher for WebResearcher {
    async fn search(&self, query: &str) -> Result<String> {
        debug!("Searching the web for: {}", query);

        let body = self
            .get_json(
                DUCKDUCKGO_URL,
                &[
                    ("q", query),
                    ("format", "json"),
                    ("no_html", "1"),
                    ("skip_disambig", "1"),
                ],
                query,
            )
            .await?;

        Ok(format_instant_answer(&body, self.max_results))
    }

    async fn lookup(&self, query: &str) -> Result<String> {
        debug!("Looking up Wikipedia for: {}", query);

        let limit = self.max_results.min(3).to_string();
        let body = self
            .get_json(
                WIKIPEDIA_URL,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("generator", "search"),
                    ("gsrsearch", query),
                    ("gsrlimit", limit.as_str()),
                    ("prop", "extracts"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                ],
                query,
            )
            .await?;

        Ok(format_wikipedia_pages(&body))
    }
}

/// Format a DuckDuckGo instant answer as a numbered list
///
/// Returns an empty string when the answer carries nothing useful.
fn format_instant_answer(body: &Value, max_results: usize) -> String {
    let mut entries = Vec::new();

    if let Some(text) = body["AbstractText"].as_str().filter(|t| !t.is_empty()) {
        let source = body["AbstractSource"].as_str().unwrap_or("Abstract");
        let url = body["AbstractURL"].as_str().unwrap_or("");
        entries.push((source.to_string(), url.to_string(), text.to_string()));
    }

    let mut topics = Vec::new();
    if let Some(related) = body["RelatedTopics"].as_array() {
        for topic in related {
            // Grouped topics nest their entries one level down
            match topic["Topics"].as_array() {
                Some(nested) => topics.extend(nested.iter()),
                None => topics.push(topic),
            }
        }
    }

    for topic in topics {
        if entries.len() >= max_results {
            break;
        }
        let Some(text) = topic["Text"].as_str().filter(|t| !t.is_empty()) else {
            continue;
        };
        let url = topic["FirstURL"].as_str().unwrap_or("");
        let title = text.split(" - ").next().unwrap_or(text);
        entries.push((title.to_string(), url.to_string(), text.to_string()));
    }

    entries
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, (title, url, text))| {
            format!(
                "{}. {}\n   {}\n   {}",
                i + 1,
                title,
                url,
                truncate(&strip_html(&text), 400)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format Wikipedia search extracts as `Page: ... / Summary: ...` blocks
fn format_wikipedia_pages(body: &Value) -> String {
    let Some(pages) = body["query"]["pages"].as_object() else {
        return String::new();
    };

    let mut pages: Vec<&Value> = pages.values().collect();
    pages.sort_by_key(|page| page["index"].as_i64().unwrap_or(i64::MAX));

    pages
        .into_iter()
        .filter_map(|page| {
            let title = page["title"].as_str()?;
            let extract = page["extract"].as_str().filter(|e| !e.trim().is_empty())?;
            Some(format!(
                "Page: {}\nSummary: {}",
                title,
                truncate(&strip_html(extract), 1500)
            ))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn strip_html(text: &str) -> String {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    match TAGS.get_or_init(|| Regex::new(r"<[^>]+>").ok()) {
        Some(tags) => tags.replace_all(text, "").trim().to_string(),
        None => text.trim().to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<SectionErrorPolicy>().unwrap(), SectionErrorPolicy::Skip);
        assert_eq!(
            "Propagate".parse::<SectionErrorPolicy>().unwrap(),
            SectionErrorPolicy::Propagate
        );
        assert!("ignore".parse::<SectionErrorPolicy>().is_err());
        assert_eq!(SectionErrorPolicy::default().to_string(), "skip");
    }

    #[test]
    fn test_format_instant_answer() {
        let body = json!({
            "AbstractText": "A container is a <b>standard unit</b> of software.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Container",
            "RelatedTopics": [
                {"Text": "Docker - A platform for containers", "FirstURL": "https://duckduckgo.com/Docker"},
                {"Name": "Runtimes", "Topics": [
                    {"Text": "runc - OCI runtime", "FirstURL": "https://duckduckgo.com/runc"}
                ]},
                {"Text": "Podman - Daemonless engine", "FirstURL": "https://duckduckgo.com/Podman"}
            ]
        });

        let text = format_instant_answer(&body, 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1. Wikipedia");
        assert!(text.contains("A container is a standard unit of software."));
        assert!(text.contains("2. Docker"));
        assert!(text.contains("3. runc"));
        assert!(!text.contains("Podman"));
    }

    #[test]
    fn test_format_instant_answer_empty() {
        assert_eq!(format_instant_answer(&json!({"AbstractText": ""}), 4), "");
    }

    #[test]
    fn test_format_wikipedia_pages() {
        let body = json!({
            "query": {"pages": {
                "200": {"title": "Podman", "index": 2, "extract": "Podman is a daemonless engine."},
                "100": {"title": "Docker (software)", "index": 1, "extract": "Docker is a set of products."},
                "300": {"title": "Empty", "index": 3, "extract": "  "}
            }}
        });

        let text = format_wikipedia_pages(&body);
        assert_eq!(
            text,
            "Page: Docker (software)\nSummary: Docker is a set of products.\n\n\
             Page: Podman\nSummary: Podman is a daemonless engine."
        );
        assert_eq!(format_wikipedia_pages(&json!({})), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("contenedor", 4), "cont...");
    }
}
