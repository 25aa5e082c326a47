//! Budgetwise CLI - Budget guidance for young adults
//!
//! Usage:
//!   budgetwise serve --port 5000             Start web server
//!   budgetwise analyze --file budget.json    Analyze a budget
//!   budgetwise glossary --search fund        Browse the glossary
//!   budgetwise explain ETF                   Explain a term
//!   budgetwise status                        Show configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let generation = commands::load_generation_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&host, port, static_dir.as_deref(), generation).await,
        Commands::Analyze {
            file,
            income,
            expenses,
            goal,
            json,
        } => {
            commands::cmd_analyze(
                file.as_deref(),
                income,
                &expenses,
                goal.as_deref(),
                json,
                &generation,
            )
            .await
        }
        Commands::Glossary {
            id,
            category,
            search,
        } => commands::cmd_glossary(id, category.as_deref(), search.as_deref()),
        Commands::Explain {
            term,
            complexity,
            question,
        } => {
            commands::cmd_explain(&term, complexity.as_deref(), question.as_deref(), &generation)
                .await
        }
        Commands::Status => commands::cmd_status(cli.config.as_deref(), &generation).await,
    }
}
