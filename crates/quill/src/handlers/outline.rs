//! Outline command

use crate::handlers::session::{refine_outline, SessionArgs, Spinner};
use crate::state::AppState;
use anyhow::Context;
use clap::Args;

/// Refine an outline interactively and print the result
///
/// Usage:
///   quill outline --topic "Containers"
///   quill outline --topic "Containers" --wishes "focus on Linux" --json
#[derive(Args, Debug, Clone)]
pub struct OutlineArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Print the finalized session as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn outline(state: &AppState, args: OutlineArgs) -> anyhow::Result<String> {
    let spinner = Spinner::default();
    let session = refine_outline(state, &args.session, &spinner).await?;

    if args.json {
        return serde_json::to_string_pretty(&session).context("Failed to serialize outline");
    }

    // The accepted outline was already printed when the session finalized
    Ok(String::new())
}
