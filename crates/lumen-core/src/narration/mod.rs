//! Narration Client - turns an analysis context into executive prose
//!
//! A narration is one chat-completion exchange. The reply is split into
//! named sections by [`parser`]. Any failure along the way is reported as a
//! [`NarrationOutcome::Failure`], which [`resolve`] turns into the canned
//! [`fallback`] narration, so callers never see a raw error.
//!
//! # Architecture
//!
//! - `NarrationBackend` trait: one async completion call plus health check
//! - `NarrationClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//! - `Narrator`: prompt rendering, the request, parsing, fallback resolution

pub mod fallback;
mod mock;
pub mod narrator;
mod openai_compatible;
pub mod parser;
pub mod prompts;
pub mod types;

pub use fallback::fallback;
pub use mock::{MockBackend, MockReply};
pub use narrator::{resolve, NarrationInput, Narrator};
pub use openai_compatible::OpenAICompatibleBackend;
pub use parser::{parse, Section};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use types::{
    NarrationErrorKind, NarrationFailure, NarrationOutcome, NarrationRequest, NarrationResult,
    NarrationSource,
};

use async_trait::async_trait;

use crate::config::{BackendKind, Credential, NarrationConfig};
use crate::error::Result;

/// Trait defining the interface for narration backends
#[async_trait]
pub trait NarrationBackend: Send + Sync {
    /// Send one exchange and return the reply text
    async fn complete(&self, request: &NarrationRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the endpoint URL (for logging)
    fn endpoint(&self) -> &str;
}

/// Concrete narration client enum
#[derive(Clone)]
pub enum NarrationClient {
    /// Any server implementing the OpenAI chat completions API (Groq by default)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Scripted backend for tests and offline demos
    Mock(MockBackend),
}

impl NarrationClient {
    /// Build the backend named in the config
    ///
    /// A missing credential is not an error here: the HTTP backend reports it
    /// as a configuration failure on first use, without touching the network.
    pub fn from_config(config: &NarrationConfig, credential: Option<Credential>) -> Result<Self> {
        match config.backend {
            BackendKind::OpenaiCompatible => Ok(NarrationClient::OpenAICompatible(
                OpenAICompatibleBackend::from_config(config, credential)?,
            )),
            BackendKind::Mock => Ok(NarrationClient::Mock(MockBackend::new())),
        }
    }

    /// Create a mock client for testing
    pub fn mock(reply: MockReply) -> Self {
        NarrationClient::Mock(MockBackend::with_reply(reply))
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            NarrationClient::OpenAICompatible(_) => BackendKind::OpenaiCompatible,
            NarrationClient::Mock(_) => BackendKind::Mock,
        }
    }
}

#[async_trait]
impl NarrationBackend for NarrationClient {
    async fn complete(&self, request: &NarrationRequest) -> Result<String> {
        match self {
            NarrationClient::OpenAICompatible(b) => b.complete(request).await,
            NarrationClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            NarrationClient::OpenAICompatible(b) => b.health_check().await,
            NarrationClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            NarrationClient::OpenAICompatible(b) => b.model(),
            NarrationClient::Mock(b) => b.model(),
        }
    }

    fn endpoint(&self) -> &str {
        match self {
            NarrationClient::OpenAICompatible(b) => b.endpoint(),
            NarrationClient::Mock(b) => b.endpoint(),
        }
    }
}
