//! In-memory full-text index over research findings
//!
//! The index is an SQLite database that lives in memory for the duration of
//! one drafting run. Findings are searched with FTS5 and ranked by bm25.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// A passage stored in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPassage {
    /// Outline position of the subtopic the passage was researched for
    pub position: usize,
    /// Subtopic the passage was researched for
    pub section: String,
    /// Passage text
    pub content: String,
}

/// Search options
#[derive(Debug, Clone, Default)]
pub struct RecallOptions {
    /// Limit results
    pub limit: Option<usize>,
    /// Skip passages researched for the subtopic at this outline position
    pub exclude_position: Option<usize>,
}

impl RecallOptions {
    /// Create a new RecallOptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Exclude passages of one subtopic
    pub fn exclude_position(mut self, position: usize) -> Self {
        self.exclude_position = Some(position);
        self
    }
}

/// Research index handle
pub struct ResearchIndex {
    pool: SqlitePool,
}

impl ResearchIndex {
    /// Open an empty index
    ///
    /// The pool holds exactly one connection that never expires, since every
    /// new connection to `:memory:` would see a separate empty database.
    pub async fn open() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let index = Self { pool };
        index.migrate().await?;

        info!("Opened in-memory research index");
        Ok(index)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE passages USING fts5(
                topic UNINDEXED,
                position UNINDEXED,
                section,
                content
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Other(format!("Failed to create research index: {}", e)))?;

        Ok(())
    }

    /// Add a passage researched for the subtopic at `position`
    ///
    /// Blank passages are ignored.
    pub async fn add(
        &self,
        topic: &str,
        position: usize,
        section: &str,
        content: &str,
    ) -> Result<()> {
        if content.trim().is_empty() {
            return Ok(());
        }

        debug!("Indexing passage for section: {}", section);

        sqlx::query(
            "INSERT INTO passages (topic, position, section, content) VALUES (?, ?, ?, ?)",
        )
        .bind(topic)
        .bind(position as i64)
        .bind(section)
        .bind(content)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find the passages most relevant to a query
    ///
    /// Any word of the query may match; results are ordered best first.
    pub async fn recall(&self, query: &str, options: RecallOptions) -> Result<Vec<IndexedPassage>> {
        let Some(expression) = match_expression(query) else {
            return Ok(Vec::new());
        };

        debug!("Recalling passages for: {}", query);

        let mut sql = String::from(
            r#"
            SELECT CAST(position AS INTEGER), section, content
            FROM passages
            WHERE passages MATCH ?
            "#,
        );

        if options.exclude_position.is_some() {
            sql.push_str(" AND CAST(position AS INTEGER) != ?");
        }

        sql.push_str(" ORDER BY bm25(passages)");

        if options.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query_builder =
            sqlx::query_as::<_, (i64, String, String)>(&sql).bind(expression);

        if let Some(position) = options.exclude_position {
            query_builder = query_builder.bind(position as i64);
        }

        if let Some(limit) = options.limit {
            query_builder = query_builder.bind(limit as i64);
        }

        let rows = query_builder.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(position, section, content)| IndexedPassage {
                position: position as usize,
                section,
                content,
            })
            .collect())
    }

    /// Count indexed passages
    pub async fn count(&self) -> Result<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    /// Close the index, discarding its contents
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Turn free text into an FTS5 expression that ORs the quoted query words
fn match_expression(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| format!("\"{}\"", word.to_lowercase()))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_index() -> ResearchIndex {
        let index = ResearchIndex::open().await.unwrap();
        index
            .add(
                "Containers",
                0,
                "Namespaces",
                "Linux namespaces isolate process trees, mounts and network stacks.",
            )
            .await
            .unwrap();
        index
            .add(
                "Containers",
                1,
                "Security",
                "Seccomp profiles and dropped capabilities harden container processes.",
            )
            .await
            .unwrap();
        index
            .add("Containers", 2, "Images", "Images are stacks of read-only layers.")
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_add_and_count() {
        let index = setup_index().await;
        index.add("Containers", 3, "Empty", "   ").await.unwrap();
        assert_eq!(index.count().await.unwrap(), 3);
        index.close().await;
    }

    #[tokio::test]
    async fn test_recall_ranks_matching_passages() {
        let index = setup_index().await;

        let results = index
            .recall("container security capabilities", RecallOptions::new())
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert_eq!(results[0].section, "Security");
    }

    #[tokio::test]
    async fn test_recall_exclude_and_limit() {
        let index = setup_index().await;

        let results = index
            .recall(
                "process namespaces capabilities",
                RecallOptions::new().exclude_position(1).limit(5),
            )
            .await
            .unwrap();

        assert!(results.iter().all(|p| p.section != "Security"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].section, "Namespaces");
        assert_eq!(results[0].position, 0);
    }

    #[tokio::test]
    async fn test_recall_excludes_by_position_not_title() {
        let index = ResearchIndex::open().await.unwrap();
        index
            .add("Kernels", 0, "Overview", "Schedulers pick the next runnable thread.")
            .await
            .unwrap();
        index
            .add("Kernels", 1, "Overview", "Schedulers balance threads across cores.")
            .await
            .unwrap();

        let results = index
            .recall("schedulers threads", RecallOptions::new().exclude_position(0))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 1);
        assert_eq!(results[0].section, "Overview");
        assert!(results[0].content.contains("cores"));
    }

    #[tokio::test]
    async fn test_recall_tolerates_punctuation() {
        let index = setup_index().await;

        let results = index
            .recall("\"images\" AND (layers)*", RecallOptions::new().limit(1))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].section, "Images");

        assert!(index.recall("?!", RecallOptions::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_match_expression() {
        assert_eq!(
            match_expression("Docker: security?").as_deref(),
            Some("\"docker\" OR \"security\"")
        );
        assert_eq!(match_expression("  --  "), None);
    }
}
