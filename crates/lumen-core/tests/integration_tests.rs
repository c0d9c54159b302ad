//! Integration tests for lumen-core
//!
//! These tests exercise the full question → classify → analyze → narrate
//! workflow, both against the scripted backend and over HTTP.

use std::io::Write;

use lumen_core::{
    analysis::ChartKind,
    config::CredentialSource,
    narration::{fallback::FALLBACK_RISKS, MockBackend, NarrationErrorKind},
    test_utils::{MockChatServer, ServerMode},
    Category, Credential, DatasetSource, NarrationClient, NarrationConfig, NarrationSource,
    Narrator, Pipeline, PromptId, PromptLibrary, SampleStore, Submission,
};

const MODEL_REPLY: &str = "\
**Executive Summary:** Revenue grew every month and June set a new high.

**Key Insights:**
- Average monthly growth held near eight percent
- June revenue reached $267,000

**Strategic Recommendations:**
1. Invest in the channels that drove the June peak

**Risk Assessment:** Growth is slowing slightly in May.

**Next Steps:** Set a Q3 target of $300,000 per month.";

fn mock_pipeline(store: SampleStore, mock: MockBackend) -> Pipeline {
    let narrator =
        Narrator::with_prompts(NarrationClient::Mock(mock), PromptLibrary::embedded_only());
    Pipeline::new(store, narrator)
}

fn http_pipeline(server: &MockChatServer) -> Pipeline {
    let config = NarrationConfig {
        url: server.chat_url(),
        ..Default::default()
    };
    let credential = Credential::new("gsk_integration", CredentialSource::Env("LUMEN_API_KEY"));
    let client = NarrationClient::from_config(&config, credential).unwrap();
    let narrator = Narrator::with_prompts(client, PromptLibrary::embedded_only());
    Pipeline::new(SampleStore::bundled(), narrator)
}

async fn completed(pipeline: &Pipeline, question: &str) -> lumen_core::Analysis {
    match pipeline.submit(question).await {
        Submission::Completed(analysis) => *analysis,
        other => panic!("expected completion, got {:?}", other),
    }
}

// =============================================================================
// Offline workflow
// =============================================================================

#[tokio::test]
async fn test_revenue_question_with_unreachable_model() {
    let pipeline = mock_pipeline(
        SampleStore::fallback(),
        MockBackend::failing(NarrationErrorKind::Transport),
    );

    let analysis = completed(&pipeline, "How is revenue trending?").await;

    assert_eq!(analysis.category, Category::Revenue);
    let context = analysis.context.as_ref().unwrap();
    assert_eq!(context.summary, "Total revenue: $1,345,000");
    assert_eq!(context.chart_kind, ChartKind::Line);

    assert_eq!(analysis.narration.source, NarrationSource::Fallback);
    assert_eq!(analysis.narration.risks, FALLBACK_RISKS);
    assert!(!analysis.narration.insights.is_empty());

    let chart = analysis.chart.as_ref().unwrap();
    assert_eq!(chart.labels.len(), 6);
    assert!(analysis.outlook.forecast.unwrap() > 267_000.0);
    assert!(analysis.outlook.anomalies.is_empty());
}

#[tokio::test]
async fn test_every_category_answers_offline() {
    let pipeline = mock_pipeline(
        SampleStore::bundled(),
        MockBackend::failing(NarrationErrorKind::Configuration),
    );

    for (question, category) in [
        ("Show me sales", Category::Revenue),
        ("Which product is best?", Category::Products),
        ("How satisfied are customers?", Category::Customers),
        ("Compare each region", Category::Regions),
        ("What are the growth trends?", Category::Trends),
        ("Give me an overview", Category::General),
    ] {
        let analysis = completed(&pipeline, question).await;
        assert_eq!(analysis.category, category, "question: {}", question);
        assert!(analysis.context.is_some(), "question: {}", question);
        assert!(!analysis.narration.insights.is_empty());
    }

    assert_eq!(pipeline.history().await.len(), 6);
}

#[tokio::test]
async fn test_dataset_override_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"customers": {{"total": 100, "satisfaction": 4.2, "new_monthly": 10, "churn_rate": 6.0, "segments": []}}}}"#
    )
    .unwrap();

    let store = SampleStore::load(Some(file.path()));
    assert_eq!(store.source(), &DatasetSource::File(file.path().to_path_buf()));

    let pipeline = mock_pipeline(store, MockBackend::new());
    let analysis = completed(&pipeline, "Any revenue data?").await;
    assert!(analysis.context.is_none());

    let analysis = completed(&pipeline, "Tell me about customers").await;
    assert_eq!(
        analysis.context.unwrap().summary,
        "100 total customers with 4.2/5 satisfaction"
    );
}

#[tokio::test]
async fn test_broken_dataset_file_uses_fallback() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let store = SampleStore::load(Some(file.path()));
    assert_eq!(store.source(), &DatasetSource::Fallback);
    assert!(store.dataset().revenue.is_some());
}

// =============================================================================
// HTTP workflow
// =============================================================================

#[tokio::test]
async fn test_http_narration_end_to_end() {
    let server = MockChatServer::start(ServerMode::Reply(MODEL_REPLY.into())).await;
    let pipeline = http_pipeline(&server);

    let analysis = completed(&pipeline, "How is revenue trending?").await;
    let narration = &analysis.narration;

    assert_eq!(narration.source, NarrationSource::Model);
    assert_eq!(
        narration.summary,
        "Revenue grew every month and June set a new high."
    );
    assert_eq!(
        narration.insights,
        vec![
            "Average monthly growth held near eight percent",
            "June revenue reached $267,000"
        ]
    );
    assert_eq!(
        narration.recommendations,
        vec!["1. Invest in the channels that drove the June peak"]
    );
    assert_eq!(narration.risks, "Growth is slowing slightly in May.");
    assert_eq!(narration.next_steps, "Set a Q3 target of $300,000 per month.");

    let sent = server.last_request().unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("How is revenue trending?"));
    assert!(user.contains("Total revenue: $1,345,000"));
    assert_eq!(
        server.last_authorization().as_deref(),
        Some("Bearer gsk_integration")
    );
}

#[tokio::test]
async fn test_http_history_reaches_prompt() {
    let server = MockChatServer::start(ServerMode::Reply(MODEL_REPLY.into())).await;
    let pipeline = http_pipeline(&server);

    completed(&pipeline, "How is revenue trending?").await;
    pipeline
        .submit_with("What comes next for sales?", PromptId::PredictiveInsights)
        .await;

    assert_eq!(server.request_count(), 2);
    let sent = server.last_request().unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Q: How is revenue trending?"));
    assert!(user.contains("A: Revenue grew every month"));
}

#[tokio::test]
async fn test_http_error_status_falls_back() {
    let server = MockChatServer::start(ServerMode::Status(500)).await;
    let pipeline = http_pipeline(&server);

    let analysis = completed(&pipeline, "Which product leads?").await;
    assert_eq!(server.request_count(), 1);
    assert!(analysis.narration.is_fallback());
    assert_eq!(
        analysis.narration.insights[0],
        "Product portfolio demonstrates diverse revenue streams"
    );
    assert_eq!(analysis.context.unwrap().chart_kind, ChartKind::Bar);
}

#[tokio::test]
async fn test_http_malformed_reply_falls_back() {
    let server = MockChatServer::start(ServerMode::Malformed).await;
    let pipeline = http_pipeline(&server);

    let analysis = completed(&pipeline, "Overview please").await;
    assert!(analysis.narration.is_fallback());
    assert_eq!(analysis.category, Category::General);
}
