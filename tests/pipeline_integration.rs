//! End-to-end tests for the research pipeline.
//!
//! Search is replaced by canned providers (no network). The summarizer is
//! either the offline extractive backend or an OpenAI-compatible endpoint
//! served by wiremock.

use deepresearch::config::{SummarizerBackend, SummarizerConfig};
use deepresearch::pipeline::VALIDATION_MESSAGE;
use deepresearch::render::NO_SOURCES_MARKER;
use deepresearch::summarizer::ExtractiveSummarizer;
use deepresearch::synthesizer::{NO_DATA_MARKER, NO_RESULTS_MARKER, SUMMARY_ERROR_MARKER};
use deepresearch::{ResearchPipeline, Retriever, SummarizerHandle, Synthesizer};
use research_search::{RawResult, SearchError, SearchProvider};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct CannedProvider {
    records: Vec<RawResult>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl SearchProvider for CannedProvider {
    async fn text_search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<RawResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Timeout("search timed out".into()));
        }
        Ok(self.records.iter().take(max_results).cloned().collect())
    }
}

fn pipeline(
    provider: CannedProvider,
    model: SummarizerHandle,
) -> ResearchPipeline<CannedProvider> {
    ResearchPipeline::new(Retriever::new(provider), Synthesizer::new(model))
}

fn article(i: usize) -> RawResult {
    json!({
        "title": format!("Ocean currents explained part {i} — Science Weekly"),
        "href": format!("https://science.example/currents/{i}"),
        "body": "Ocean currents move heat around the planet. Wind and salinity drive them. \
                 They shape regional climate and marine life in many ways.",
    })
}

#[tokio::test]
async fn duplicate_urls_collapse_to_one_verbatim_result() {
    let provider = CannedProvider {
        records: vec![
            json!({"title": "Test Result", "href": "http://test.com", "body": "Test content"}),
            json!({"title": "Test Copy", "href": "http://test.com", "body": "Other content"}),
        ],
        ..Default::default()
    };
    let pipeline = pipeline(provider, SummarizerHandle::ready(ExtractiveSummarizer));

    let outcome = pipeline.research("Test Topic").await;
    assert_eq!(outcome.summary, "Test Result\nTest content");
    assert_eq!(outcome.links.len(), 1);
    assert_eq!(outcome.links[0].url, "http://test.com");

    let rendered = pipeline.run("Test Topic").await;
    assert_eq!(rendered.summary, "Test Result\nTest content");
    assert!(rendered.links_html.contains("href=\"http://test.com\""));
}

#[tokio::test]
async fn short_queries_never_reach_the_provider() {
    let provider = CannedProvider {
        records: vec![article(0)],
        ..Default::default()
    };
    let calls = Arc::clone(&provider.calls);
    let pipeline = pipeline(provider, SummarizerHandle::ready(ExtractiveSummarizer));

    for query in ["", "a", "ab"] {
        let rendered = pipeline.run(query).await;
        assert_eq!(rendered.summary, VALIDATION_MESSAGE);
        assert!(rendered.links_html.is_empty());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_failure_degrades_to_no_results() {
    let provider = CannedProvider {
        fail: true,
        ..Default::default()
    };
    let pipeline = pipeline(provider, SummarizerHandle::ready(ExtractiveSummarizer));

    let rendered = pipeline.run("ocean currents").await;
    assert_eq!(rendered.summary, NO_RESULTS_MARKER);
    assert_eq!(rendered.links_html, NO_SOURCES_MARKER);
}

#[tokio::test]
async fn runs_are_deterministic() {
    let provider = CannedProvider {
        records: (0..8).map(article).collect(),
        ..Default::default()
    };
    let pipeline = pipeline(provider, SummarizerHandle::ready(ExtractiveSummarizer));

    let first = pipeline.run("ocean currents").await;
    let second = pipeline.run("ocean currents").await;
    assert_eq!(first, second);
    assert_eq!(first.links.len(), 5);
    assert!(first.summary.split_whitespace().count() <= 130);
}

#[tokio::test]
async fn concurrent_queries_share_one_pipeline() {
    let provider = CannedProvider {
        records: (0..3).map(article).collect(),
        ..Default::default()
    };
    let calls = Arc::clone(&provider.calls);
    let pipeline = Arc::new(pipeline(provider, SummarizerHandle::ready(ExtractiveSummarizer)));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move { pipeline.run("ocean currents").await }));
    }
    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.expect("task should not panic"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(outcomes.windows(2).all(|pair| pair[0] == pair[1]));
}

fn endpoint_config(server: &MockServer) -> SummarizerConfig {
    SummarizerConfig {
        backend: SummarizerBackend::OpenaiCompatible,
        base_url: server.uri(),
        model: "llama3.2".into(),
        timeout_secs: 2,
        probe_timeout_secs: 2,
        ..Default::default()
    }
}

async fn mount_models(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "llama3.2"}]})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn openai_endpoint_end_to_end() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Currents redistribute heat."},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = SummarizerHandle::initialize(&endpoint_config(&server)).await;
    assert!(model.is_ready());

    let provider = CannedProvider {
        records: (0..3).map(article).collect(),
        ..Default::default()
    };
    let rendered = pipeline(provider, model).run("ocean currents").await;
    assert_eq!(rendered.summary, "Currents redistribute heat.");
    assert_eq!(rendered.links.len(), 3);
    assert_eq!(rendered.links[0].title, "Ocean currents explained part 0");
    assert_eq!(rendered.links[0].source, "Science Weekly");
}

#[tokio::test]
async fn endpoint_error_yields_error_marker() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let model = SummarizerHandle::initialize(&endpoint_config(&server)).await;
    let provider = CannedProvider {
        records: (0..3).map(article).collect(),
        ..Default::default()
    };
    let rendered = pipeline(provider, model).run("ocean currents").await;
    assert_eq!(rendered.summary, SUMMARY_ERROR_MARKER);
    assert_eq!(rendered.links.len(), 3);
}

#[tokio::test]
async fn unreachable_endpoint_yields_no_data_marker() {
    let config = SummarizerConfig {
        base_url: "http://127.0.0.1:9".into(),
        probe_timeout_secs: 1,
        ..Default::default()
    };
    let model = SummarizerHandle::initialize(&config).await;
    assert!(!model.is_ready());

    let provider = CannedProvider {
        records: (0..3).map(article).collect(),
        ..Default::default()
    };
    let rendered = pipeline(provider, model).run("ocean currents").await;
    assert_eq!(rendered.summary, NO_DATA_MARKER);
    assert_ne!(rendered.links_html, NO_SOURCES_MARKER);
}
