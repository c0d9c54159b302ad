//! Lumen CLI - Business question dashboard
//!
//! Usage:
//!   lumen ask "How is revenue trending?"   Answer one question
//!   lumen chat                             Interactive session
//!   lumen chart revenue                    Terminal chart for a category
//!   lumen serve --port 3000                Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
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

    let data = cli.data.as_deref();

    match cli.command {
        Commands::Ask {
            question,
            mode,
            json,
        } => commands::cmd_ask(data, &question.join(" "), &mode, json).await,
        Commands::Chat { mode } => commands::cmd_chat(data, &mode).await,
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(data, &host, port, static_dir.as_deref(), allowed_origins).await
        }
        Commands::Dataset { json } => commands::cmd_dataset(data, json),
        Commands::Chart { category, width } => commands::cmd_chart(data, &category, width),
        Commands::Check => commands::cmd_check().await,
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
