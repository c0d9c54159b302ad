//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ask` - Question commands (ask, chat)
//! - `check` - Narration config, credential and endpoint check
//! - `core` - Shared utilities (open_pipeline, parse_mode, format_value)
//! - `dataset` - Dataset commands (dataset, chart)
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod ask;
pub mod check;
pub mod core;
pub mod dataset;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use ask::*;
pub use check::*;
pub use core::*;
pub use dataset::*;
pub use prompts::*;
pub use serve::*;

/// Truncate a string to a maximum length in characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
