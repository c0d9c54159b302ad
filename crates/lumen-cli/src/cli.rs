//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lumen - Ask business questions, get grounded answers
#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Business question dashboard with AI narration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Sample dataset JSON (defaults to the bundled document)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask one business question
    Ask {
        /// The question, e.g. "How is revenue trending?"
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,

        /// Narration mode: analysis, predictive, benchmark
        #[arg(short, long, default_value = "analysis")]
        mode: String,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session; earlier answers inform later ones
    Chat {
        /// Narration mode: analysis, predictive, benchmark
        #[arg(short, long, default_value = "analysis")]
        mode: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing the dashboard's static files
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Show the loaded dataset and per-category summaries
    Dataset {
        /// Print the raw dataset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw a category's chart in the terminal
    Chart {
        /// Category: revenue, products, customers, regions
        category: String,

        /// Bar width in characters
        #[arg(short, long, default_value = "40")]
        width: usize,
    },

    /// Check narration config, credential and endpoint
    Check,

    /// Manage narration prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show a prompt's content
    Show {
        /// Prompt ID (e.g. business_analysis, predictive, benchmark)
        id: String,
    },

    /// Print the override directory
    Path,
}
