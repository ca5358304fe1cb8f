//! Interactive outline session shared by the commands

use crate::state::AppState;
use anyhow::Context;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use quill_core::{
    Error, OutlineObserver, OutlineOptions, OutlineWorkflow, Session, SessionId, Step,
    SubtopicList,
};
use std::future::Future;
use std::io::{self, BufRead, IsTerminal};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

/// Arguments for the outline refinement loop
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Article topic (prompted when missing)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Initial wishes for the article (repeatable)
    #[arg(short, long = "wishes")]
    pub wishes: Vec<String>,

    /// Maximum number of outline generation rounds
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Ask which subtopics to drop after accepting the outline
    #[arg(long)]
    pub review_selection: bool,
}

impl SessionArgs {
    fn options(&self) -> OutlineOptions {
        OutlineOptions {
            max_rounds: self.max_rounds,
            review_selection: self.review_selection,
        }
    }
}

/// Spinner shown while a generation call is running
///
/// Terminal output produced during a call goes through [`Spinner::suspend`]
/// so it does not tear the spinner line.
#[derive(Clone, Default)]
pub struct Spinner {
    current: Arc<Mutex<Option<ProgressBar>>>,
}

impl Spinner {
    /// Run a future with a spinner showing `message`
    pub async fn run<F, T>(&self, message: &str, future: F) -> T
    where
        F: Future<Output = T>,
    {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.set(Some(bar.clone()));

        let output = future.await;

        bar.finish_and_clear();
        self.set(None);
        output
    }

    /// Run `f` with the spinner hidden
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        let bar = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    fn set(&self, bar: Option<ProgressBar>) {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = bar;
    }
}

/// Observer that prints the outline as a table
pub struct TerminalObserver {
    spinner: Spinner,
}

impl TerminalObserver {
    pub fn new(spinner: Spinner) -> Self {
        Self { spinner }
    }
}

impl OutlineObserver for TerminalObserver {
    fn on_display(&self, _session_id: SessionId, subtopics: &SubtopicList) {
        let table = subtopic_table(subtopics);
        self.spinner
            .suspend(|| println!("\nCurrent subtopics:\n{}\n", table));
    }

    fn on_finalize(&self, _session_id: SessionId, session: &Session) {
        let report = finalized_report(session);
        self.spinner.suspend(|| println!("{}", report));
    }
}

/// Final outline of an accepted session, after any subtopics were dropped
pub fn finalized_report(session: &Session) -> String {
    format!(
        "\n# {}\n{}\n\n✓ Outline accepted: {} subtopics, {} wishes",
        session.topic,
        subtopic_table(&session.subtopics),
        session.subtopics.len(),
        session.preferences.len()
    )
}

/// Render the outline as a numbered table
pub fn subtopic_table(subtopics: &SubtopicList) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::Green),
            Cell::new("Subtopic").fg(Color::Green),
            Cell::new("Description").fg(Color::Green),
        ]);

    for (i, subtopic) in subtopics.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&subtopic.title).fg(Color::Cyan),
            Cell::new(&subtopic.description),
        ]);
    }

    table
}

fn ask(prompt: &str, allow_empty: bool) -> anyhow::Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        eprint!("{}: ", prompt);
        return read_answer(&mut stdin.lock(), allow_empty);
    }

    let answer = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .interact_text()
        .context("Failed to read from terminal")?;
    Ok(answer)
}

/// Read one answer line from piped input
///
/// Only the line terminator is stripped. Blank lines are skipped unless
/// `allow_empty` is set.
fn read_answer(reader: &mut impl BufRead, allow_empty: bool) -> anyhow::Result<String> {
    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Err(anyhow::Error::new(io::Error::from(io::ErrorKind::UnexpectedEof))
                .context("Input ended before an answer was given"));
        }

        let answer = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line.as_str());
        if allow_empty || !answer.trim().is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Run the outline refinement loop until the operator accepts the outline
///
/// Rejected answers are reported and the pending prompt is asked again.
pub async fn refine_outline(
    state: &AppState,
    args: &SessionArgs,
    spinner: &Spinner,
) -> anyhow::Result<Session> {
    let (topic, wishes) = match &args.topic {
        Some(topic) => (topic.clone(), args.wishes.clone()),
        None => {
            let topic = ask("Article topic", false)?;
            let mut wishes = args.wishes.clone();
            if wishes.is_empty() {
                wishes.push(ask("Wishes for the article", true)?);
            }
            (topic, wishes)
        }
    };

    let workflow = OutlineWorkflow::new(state.generator.clone())
        .with_observer(Arc::new(TerminalObserver::new(spinner.clone())))
        .with_options(args.options());

    let id = workflow.open(topic, wishes).await?;
    let mut step = spinner
        .run("Generating outline", workflow.advance(id))
        .await
        .context("Failed to generate outline")?;

    while let Step::Suspended { prompt } = &step {
        let answer = ask(prompt, true)?;

        step = match spinner
            .run("Updating outline", workflow.resume(id, &answer))
            .await
        {
            Ok(next) => next,
            Err(e @ (Error::InvalidResumeInput { .. } | Error::RoundLimitReached { .. })) => {
                warn!("Answer rejected: {}", e);
                eprintln!("✗ {}", e);
                workflow.advance(id).await?
            }
            Err(e) => return Err(anyhow::Error::from(e).context("Failed to update outline")),
        };
    }

    let checkpoint = workflow.checkpoint(id).await?;
    workflow.discard(id).await?;
    Ok(checkpoint.session)
}
