//! Mock backend for testing
//!
//! Returns a scripted reply (or a scripted failure) without any network.
//! Also used by `LUMEN_BACKEND=mock` for offline demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{NarrationErrorKind, NarrationRequest};
use super::NarrationBackend;

/// Canned reply in the rubric's format
pub const SAMPLE_REPLY: &str = "\
Executive Summary: Performance is healthy, with steady month-over-month growth and a concentrated set of high-value offerings.

Key Insights:
- Growth has stayed positive in every reported period
- A small number of offerings account for most of the revenue
- Satisfaction remains well above typical industry levels

Strategic Recommendations:
- Double down on the fastest-growing offerings
- Review pricing and positioning for declining lines

Risk Assessment: Concentration in a few offerings increases exposure to churn in those accounts.

Next Steps: Set quarterly targets per offering and review progress monthly.";

/// What the mock answers with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Fail(NarrationErrorKind),
}

impl Default for MockReply {
    fn default() -> Self {
        MockReply::Text(SAMPLE_REPLY.to_string())
    }
}

/// Mock narration backend
#[derive(Clone, Default)]
pub struct MockBackend {
    reply: MockReply,
    /// Simulated latency before replying
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a mock that answers with `SAMPLE_REPLY`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            ..Self::default()
        }
    }

    /// Create a mock whose every call fails with `kind`
    pub fn failing(kind: NarrationErrorKind) -> Self {
        Self::with_reply(MockReply::Fail(kind))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completion calls made (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrationBackend for MockBackend {
    async fn complete(&self, _request: &NarrationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(NarrationErrorKind::Configuration) => {
                Err(Error::Configuration("mock: no credential".into()))
            }
            MockReply::Fail(NarrationErrorKind::Transport) => Err(Error::Status {
                status: 503,
                body: "mock: service unavailable".into(),
            }),
            MockReply::Fail(NarrationErrorKind::MalformedResponse) => {
                Err(Error::MalformedResponse("mock: no choices".into()))
            }
        }
    }

    async fn health_check(&self) -> bool {
        !matches!(self.reply, MockReply::Fail(_))
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn endpoint(&self) -> &str {
        "mock://narration"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NarrationRequest {
        NarrationRequest {
            system: String::new(),
            user: "q".into(),
        }
    }

    #[tokio::test]
    async fn test_default_reply() {
        let mock = MockBackend::new();
        assert_eq!(mock.complete(&request()).await.unwrap(), SAMPLE_REPLY);
        assert!(mock.health_check().await);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_map_to_kind() {
        for kind in [
            NarrationErrorKind::Configuration,
            NarrationErrorKind::Transport,
            NarrationErrorKind::MalformedResponse,
        ] {
            let mock = MockBackend::failing(kind);
            let err = mock.complete(&request()).await.unwrap_err();
            assert_eq!(NarrationErrorKind::classify(&err), kind);
            assert!(!mock.health_check().await);
        }
    }

    #[tokio::test]
    async fn test_call_count_shared_across_clones() {
        let mock = MockBackend::new();
        let clone = mock.clone();
        clone.complete(&request()).await.unwrap();
        assert_eq!(mock.calls(), 1);
    }
}
