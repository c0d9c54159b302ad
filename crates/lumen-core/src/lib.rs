//! Lumen Core Library
//!
//! Shared functionality for the Lumen business question dashboard:
//! - Sample dataset loading with a built-in fallback
//! - Keyword classification of free-text questions
//! - Per-category analysis, anomaly detection and forecasting
//! - Narration through an OpenAI-compatible endpoint with canned fallback
//! - Prompt library for customizable narration prompts
//! - Pipeline controller with a bounded conversation log

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod narration;
pub mod pipeline;

/// Test utilities including mock chat-completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{AnalysisContext, AnalysisEngine, ChartKind, ChartSpec, Outlook};
pub use classifier::{classify, Category};
pub use config::{resolve_credential, BackendKind, Credential, NarrationConfig};
pub use dataset::{Dataset, DatasetSource, SampleStore};
pub use error::{Error, Result};
pub use narration::{
    NarrationBackend, NarrationClient, NarrationInput, NarrationResult, NarrationSource, Narrator,
    PromptId, PromptLibrary,
};
pub use pipeline::{Analysis, ConversationLog, LogEntry, Pipeline, Submission};
