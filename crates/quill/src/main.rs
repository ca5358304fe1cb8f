//! Quill CLI - LLM article writing assistant
//!
//! A command-line tool that refines an article outline interactively, then
//! researches, drafts and assembles the article.

mod exit_codes;
mod handlers;
mod state;

use clap::{Parser, Subcommand};
use exit_codes::{codes, exit_code_for};
use handlers::{outline, write};
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Outline and write articles with LLMs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refine an outline, then draft and save the article
    Write(write::WriteArgs),
    /// Refine an outline and print it
    Outline(outline::OutlineArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Initialize application state
    let state = match AppState::new() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to initialize quill: {:#}", e);
            std::process::exit(codes::GENERIC);
        }
    };

    // Execute
    let result = match cli.command {
        Commands::Write(args) => write::write(&state, args).await,
        Commands::Outline(args) => outline::outline(&state, args).await,
    };

    // Output
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            std::process::exit(codes::SUCCESS);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}
