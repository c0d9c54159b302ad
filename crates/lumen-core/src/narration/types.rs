//! Narration result and failure types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::AnalysisContext;
use crate::classifier::Category;
use crate::error::Error;

/// Where a narration's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationSource {
    /// Parsed from a model reply
    Model,
    /// Canned text substituted after a failure
    Fallback,
}

/// Display-ready narration
///
/// Every field is always populated. A section the model left out is an empty
/// string or list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationResult {
    pub category: Category,
    pub source: NarrationSource,
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub risks: String,
    pub next_steps: String,
    /// The unparsed reply (empty for fallbacks)
    pub raw_text: String,
    /// Grounding context the narration was produced from
    pub context: Option<AnalysisContext>,
    pub produced_at: DateTime<Utc>,
}

impl NarrationResult {
    pub fn is_fallback(&self) -> bool {
        self.source == NarrationSource::Fallback
    }
}

/// Why a narration attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationErrorKind {
    /// Credential unresolved or placeholder; no request was sent
    Configuration,
    /// Network failure or non-success status
    Transport,
    /// Success status but the reply lacked the expected fields
    MalformedResponse,
}

impl NarrationErrorKind {
    /// Map a library error onto the narration failure taxonomy
    pub fn classify(error: &Error) -> Self {
        match error {
            Error::Configuration(_) => Self::Configuration,
            Error::MalformedResponse(_) | Error::Json(_) => Self::MalformedResponse,
            _ => Self::Transport,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for NarrationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrationFailure {
    pub kind: NarrationErrorKind,
    pub message: String,
}

impl From<Error> for NarrationFailure {
    fn from(error: Error) -> Self {
        Self {
            kind: NarrationErrorKind::classify(&error),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for NarrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Result of one narration attempt, before fallback resolution
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationOutcome {
    Success(NarrationResult),
    Failure(NarrationFailure),
}

impl NarrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, NarrationOutcome::Success(_))
    }
}

/// One system + user exchange sent to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub system: String,
    pub user: String,
}
