//! Write command

use crate::handlers::session::{refine_outline, SessionArgs, Spinner};
use crate::state::AppState;
use anyhow::Context;
use clap::Args;
use quill_generator::{ArticleAssembler, DraftingPipeline, GenerationOptions, SectionErrorPolicy};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outline, draft and assemble an article
///
/// Usage:
///   quill write --topic "Containers" --wishes "add a section on security"
///   quill write --no-research --no-polish --output-dir drafts
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Directory the article is written to
    #[arg(short, long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Skip the web research phase
    #[arg(long)]
    pub no_research: bool,

    /// Skip the final editing pass
    #[arg(long)]
    pub no_polish: bool,

    /// What to do when a research call fails (skip, propagate)
    #[arg(long, default_value = "skip")]
    pub on_section_error: SectionErrorPolicy,

    /// Related research passages added to each section
    #[arg(long, default_value_t = 3)]
    pub research_hits: usize,
}

impl WriteArgs {
    fn options(&self) -> GenerationOptions {
        GenerationOptions {
            research: !self.no_research,
            polish: !self.no_polish,
            on_section_error: self.on_section_error,
            research_hits: self.research_hits,
        }
    }
}

pub async fn write(state: &AppState, args: WriteArgs) -> anyhow::Result<String> {
    let spinner = Spinner::default();
    let session = refine_outline(state, &args.session, &spinner).await?;
    let options = args.options();

    let pipeline = DraftingPipeline::new(state.generator.clone())
        .with_researcher(state.researcher.clone())
        .with_options(options.clone());

    let sections = spinner
        .run("Drafting sections", pipeline.draft(&session))
        .await
        .context("Failed to draft sections")?;

    let article = if options.polish {
        let assembler = ArticleAssembler::new(state.generator.clone());
        spinner
            .run("Polishing article", assembler.polish(&session.topic, &sections))
            .await
            .context("Failed to polish article")?
    } else {
        ArticleAssembler::assemble(&session.topic, &sections)
    };

    let path = save_article(&args.output_dir, &session.topic, &article)?;
    info!("Article written to {}", path.display());

    Ok(format!("{}\n\n✓ Saved to {}", article, path.display()))
}

/// Path of the article file for a topic
///
/// Path separators in the topic are replaced so the file always lands
/// directly inside `dir`.
pub fn article_path(dir: &Path, topic: &str) -> PathBuf {
    let name: String = topic
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();

    let name = if name.trim_matches('.').is_empty() {
        "article".to_string()
    } else {
        name
    };

    dir.join(format!("{}.md", name))
}

/// Write the article, creating the directory if needed
pub fn save_article(dir: &Path, topic: &str, article: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = article_path(dir, topic);
    fs::write(&path, article)
        .with_context(|| format!("Failed to write article to {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_article_path_replaces_separators() {
        let dir = Path::new("outputs");
        assert_eq!(
            article_path(dir, "Containers"),
            PathBuf::from("outputs/Containers.md")
        );
        assert_eq!(
            article_path(dir, "TCP/IP vs UDP\\QUIC"),
            PathBuf::from("outputs/TCP-IP vs UDP-QUIC.md")
        );
        assert_eq!(article_path(dir, " .. "), PathBuf::from("outputs/article.md"));
    }

    #[test]
    fn test_save_article_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("outputs");

        let path = save_article(&dir, "Containers", "# Containers\n\nBody").unwrap();

        assert_eq!(path, dir.join("Containers.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Containers\n\nBody");
    }

    #[test]
    fn test_write_args_options() {
        let args = WriteArgs {
            session: SessionArgs::default(),
            output_dir: PathBuf::from("outputs"),
            no_research: true,
            no_polish: false,
            on_section_error: SectionErrorPolicy::Propagate,
            research_hits: 5,
        };

        let options = args.options();
        assert!(!options.research);
        assert!(options.polish);
        assert_eq!(options.on_section_error, SectionErrorPolicy::Propagate);
        assert_eq!(options.research_hits, 5);
    }
}
