//! Pipeline Controller - runs one question end to end
//!
//! question → classify → analyze → narrate → parse
//!
//! The controller owns the only mutable state in the system: the in-flight
//! flag and the conversation log. At most one question runs at a time; a
//! question submitted while another is running is dropped, not queued.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::analysis::{outlook, recommend, AnalysisContext, AnalysisEngine, ChartSpec, Outlook};
use crate::classifier::{classify, Category};
use crate::config::{resolve_credential, NarrationConfig};
use crate::dataset::SampleStore;
use crate::error::Result;
use crate::narration::{
    NarrationBackend, NarrationClient, NarrationInput, NarrationResult, Narrator, PromptId,
};

/// Conversation log capacity
pub const MAX_LOG_ENTRIES: usize = 10;

/// Turns of history included in each prompt
pub const CONTEXT_TURNS: usize = 3;

/// One answered question
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub question: String,
    pub result: NarrationResult,
    pub asked_at: DateTime<Utc>,
}

/// Bounded history of answered questions, oldest first
#[derive(Debug)]
pub struct ConversationLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once over capacity
    pub fn push(&mut self, question: impl Into<String>, result: NarrationResult) {
        self.entries.push_back(LogEntry {
            question: question.into(),
            result,
            asked_at: Utc::now(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The last `turns` entries as `Q: ...\nA: <summary>` blocks
    pub fn recent_context(&self, turns: usize) -> String {
        let skip = self.entries.len().saturating_sub(turns);
        self.entries
            .iter()
            .skip(skip)
            .map(|e| format!("Q: {}\nA: {}", e.question, e.result.summary))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Everything produced for one question
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub question: String,
    pub category: Category,
    pub context: Option<AnalysisContext>,
    pub outlook: Outlook,
    /// Rule-based recommendations computed from the data
    pub recommendations: Vec<String>,
    pub chart: Option<ChartSpec>,
    pub narration: NarrationResult,
}

/// What happened to a submitted question
#[derive(Debug)]
pub enum Submission {
    Completed(Box<Analysis>),
    /// Another question was in flight; nothing was done
    Busy,
    /// The question was blank; nothing was done
    Empty,
}

/// Clears the in-flight flag when dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Pipeline {
    store: SampleStore,
    engine: AnalysisEngine,
    narrator: Narrator,
    log: RwLock<ConversationLog>,
    in_flight: AtomicBool,
}

impl Pipeline {
    pub fn new(store: SampleStore, narrator: Narrator) -> Self {
        Self {
            store,
            engine: AnalysisEngine::new(),
            narrator,
            log: RwLock::new(ConversationLog::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Build from layered config, the resolved credential, and a dataset path
    pub fn from_env(data_path: Option<&Path>) -> Result<Self> {
        let config = NarrationConfig::load()?;
        let credential = resolve_credential();
        if credential.is_none() && config.backend == crate::config::BackendKind::OpenaiCompatible {
            info!("No API key configured, narration will use built-in fallback text");
        }

        let client = NarrationClient::from_config(&config, credential)?;
        Ok(Self::new(SampleStore::load(data_path), Narrator::new(client)))
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Context for a category, without narration
    pub fn context_for(&self, category: Category) -> Option<AnalysisContext> {
        self.engine.analyze(category, self.store.dataset())
    }

    /// Classify and analyze a question, without narration
    pub fn preview(&self, question: &str) -> (Category, Option<AnalysisContext>) {
        let category = classify(question);
        (category, self.context_for(category))
    }

    /// Answer a question with the business-analysis prompt
    pub async fn submit(&self, question: &str) -> Submission {
        self.submit_with(question, PromptId::BusinessAnalysis).await
    }

    /// Answer a question with a specific prompt
    pub async fn submit_with(&self, question: &str, prompt: PromptId) -> Submission {
        let question = question.trim();
        if question.is_empty() {
            return Submission::Empty;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!(question, "Analysis already in progress, dropping question");
            return Submission::Busy;
        };

        let (category, context) = self.preview(question);
        let history = self.log.read().await.recent_context(CONTEXT_TURNS);

        let input = NarrationInput::new(question, category, context.as_ref())
            .with_history(&history)
            .with_prompt(prompt);
        let narration = self.narrator.narrate(&input).await;

        self.log.write().await.push(question, narration.clone());

        info!(
            category = %category,
            grounded = context.is_some(),
            source = ?narration.source,
            model = self.narrator.client().model(),
            "Question answered"
        );

        let (outlook, recommendations, chart) = match &context {
            Some(ctx) => (outlook(ctx), recommend(ctx), ChartSpec::from_context(ctx)),
            None => (Outlook::default(), Vec::new(), None),
        };

        Submission::Completed(Box::new(Analysis {
            question: question.to_string(),
            category,
            context,
            outlook,
            recommendations,
            chart,
            narration,
        }))
    }

    /// Snapshot of the conversation log, oldest first
    pub async fn history(&self) -> Vec<LogEntry> {
        self.log.read().await.entries().cloned().collect()
    }

    pub async fn clear_history(&self) {
        self.log.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::fallback::{fallback, FALLBACK_RISKS};
    use crate::narration::{MockBackend, MockReply, NarrationErrorKind, PromptLibrary};
    use std::sync::Arc;
    use std::time::Duration;

    fn pipeline_with(mock: MockBackend) -> Pipeline {
        let narrator =
            Narrator::with_prompts(NarrationClient::Mock(mock), PromptLibrary::embedded_only());
        Pipeline::new(SampleStore::fallback(), narrator)
    }

    #[test]
    fn test_log_evicts_oldest() {
        let mut log = ConversationLog::new();
        for i in 0..15 {
            log.push(format!("question {}", i), fallback(Category::General, None));
        }

        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        let questions: Vec<&str> = log.entries().map(|e| e.question.as_str()).collect();
        let expected: Vec<String> = (5..15).map(|i| format!("question {}", i)).collect();
        assert_eq!(questions, expected);
    }

    #[test]
    fn test_recent_context_format() {
        let mut log = ConversationLog::new();
        assert_eq!(log.recent_context(3), "");

        for i in 0..4 {
            log.push(format!("q{}", i), fallback(Category::Revenue, None));
        }
        let context = log.recent_context(3);
        let summary = fallback(Category::Revenue, None).summary;

        assert!(!context.contains("q0"));
        assert!(context.starts_with(&format!("Q: q1\nA: {}", summary)));
        assert_eq!(context.matches("\n\nQ: ").count(), 2);
    }

    #[tokio::test]
    async fn test_empty_question() {
        let mock = MockBackend::new();
        let pipeline = pipeline_with(mock.clone());

        assert!(matches!(pipeline.submit("   ").await, Submission::Empty));
        assert_eq!(mock.calls(), 0);
        assert!(pipeline.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_records_history() {
        let pipeline = pipeline_with(MockBackend::new());

        let Submission::Completed(analysis) = pipeline.submit("Which product leads?").await else {
            panic!("expected completion");
        };
        assert_eq!(analysis.category, Category::Products);
        assert!(analysis.chart.is_some());
        assert_eq!(
            analysis.recommendations,
            vec!["Review strategy for declining products: Mobile App"]
        );

        let history = pipeline.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].question, "Which product leads?");
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_ungrounded_category_still_narrated() {
        let pipeline = pipeline_with(MockBackend::failing(NarrationErrorKind::Transport));

        let Submission::Completed(analysis) = pipeline.submit("Which region is best?").await
        else {
            panic!("expected completion");
        };
        assert_eq!(analysis.category, Category::Regions);
        assert!(analysis.context.is_none());
        assert!(analysis.chart.is_none());
        assert_eq!(analysis.narration.risks, FALLBACK_RISKS);
        assert!(!analysis.narration.insights.is_empty());
    }

    #[tokio::test]
    async fn test_second_question_while_busy_is_dropped() {
        let mock = MockBackend::with_reply(MockReply::default()).with_delay(Duration::from_millis(200));
        let pipeline = Arc::new(pipeline_with(mock.clone()));

        let first = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.submit("How is revenue?").await })
        };

        // Wait until the first question holds the flag
        while !pipeline.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(matches!(
            pipeline.submit("How are sales?").await,
            Submission::Busy
        ));

        assert!(matches!(first.await.unwrap(), Submission::Completed(_)));
        assert_eq!(mock.calls(), 1);
        assert_eq!(pipeline.history().await.len(), 1);
        assert!(!pipeline.is_busy());

        // Flag is clear again, so the next question runs
        assert!(matches!(
            pipeline.submit("How are sales?").await,
            Submission::Completed(_)
        ));
    }

    #[tokio::test]
    async fn test_clear_history() {
        let pipeline = pipeline_with(MockBackend::new());
        pipeline.submit("Overview please").await;
        pipeline.clear_history().await;
        assert!(pipeline.history().await.is_empty());
    }
}
