//! Narrator - prompt rendering, the request, and fallback resolution

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::analysis::AnalysisContext;
use crate::classifier::Category;
use crate::error::{Error, Result};

use super::fallback::fallback;
use super::parser::parse;
use super::prompts::{PromptId, PromptLibrary};
use super::types::{NarrationFailure, NarrationOutcome, NarrationRequest, NarrationResult};
use super::{NarrationBackend, NarrationClient};

/// Placeholder sent when a category has no backing data
const NO_GROUNDING: &str =
    "No structured data is available for this question. Answer from the question alone and say which figures would be needed.";

/// Everything one narration needs
#[derive(Debug, Clone, Copy)]
pub struct NarrationInput<'a> {
    pub question: &'a str,
    pub category: Category,
    pub context: Option<&'a AnalysisContext>,
    /// Recent `Q:/A:` turns, empty for none
    pub history: &'a str,
    pub prompt: PromptId,
}

impl<'a> NarrationInput<'a> {
    /// Business-analysis narration with no history
    pub fn new(
        question: &'a str,
        category: Category,
        context: Option<&'a AnalysisContext>,
    ) -> Self {
        Self {
            question,
            category,
            context,
            history: "",
            prompt: PromptId::default(),
        }
    }

    pub fn with_history(mut self, history: &'a str) -> Self {
        self.history = history;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptId) -> Self {
        self.prompt = prompt;
        self
    }
}

pub struct Narrator {
    client: NarrationClient,
    prompts: RwLock<PromptLibrary>,
}

impl Narrator {
    /// Create with the default prompt library (embedded + overrides)
    pub fn new(client: NarrationClient) -> Self {
        Self::with_prompts(client, PromptLibrary::new())
    }

    pub fn with_prompts(client: NarrationClient, prompts: PromptLibrary) -> Self {
        Self {
            client,
            prompts: RwLock::new(prompts),
        }
    }

    pub fn client(&self) -> &NarrationClient {
        &self.client
    }

    /// Render the system and user messages for an input
    pub fn build_request(&self, input: &NarrationInput<'_>) -> Result<NarrationRequest> {
        let context = match input.context {
            Some(context) => serde_json::to_string_pretty(context)?,
            None => NO_GROUNDING.to_string(),
        };

        let vars = HashMap::from([
            ("question", input.question),
            ("context", context.as_str()),
            ("history", input.history),
        ]);

        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let prompt = prompts.get(input.prompt)?;

        Ok(NarrationRequest {
            system: prompt.render_system(&vars),
            user: prompt.render_user(&vars),
        })
    }

    /// One narration attempt with every failure captured as data
    pub async fn try_narrate(&self, input: &NarrationInput<'_>) -> NarrationOutcome {
        let request = match self.build_request(input) {
            Ok(request) => request,
            Err(e) => return NarrationOutcome::Failure(e.into()),
        };

        match self.client.complete(&request).await {
            Ok(reply) => {
                debug!(
                    model = self.client.model(),
                    chars = reply.len(),
                    "Narration reply received"
                );
                NarrationOutcome::Success(parse(&reply, input.category, input.context))
            }
            Err(e) => NarrationOutcome::Failure(NarrationFailure::from(e)),
        }
    }

    /// Narrate, substituting the canned fallback on any failure
    pub async fn narrate(&self, input: &NarrationInput<'_>) -> NarrationResult {
        let outcome = self.try_narrate(input).await;
        resolve(outcome, input.category, input.context)
    }
}

/// Turn an outcome into a narration, using the fallback for failures
pub fn resolve(
    outcome: NarrationOutcome,
    category: Category,
    context: Option<&AnalysisContext>,
) -> NarrationResult {
    match outcome {
        NarrationOutcome::Success(result) => result,
        NarrationOutcome::Failure(failure) => {
            warn!(
                kind = %failure.kind,
                error = %failure.message,
                category = %category,
                "Narration failed, using fallback"
            );
            fallback(category, context)
        }
    }
}
