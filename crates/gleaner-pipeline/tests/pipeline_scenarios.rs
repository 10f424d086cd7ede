//! Candidates driven end to end against a scripted oracle and SQLite

use async_trait::async_trait;
use gleaner_domain::traits::{ArticleRepository, ContentFetcher, ContentRenderer};
use gleaner_domain::{ArticleRecord, RecordId, Stage, StoredArticle};
use gleaner_extractor::{OracleClient, OracleConfig};
use gleaner_gatekeeper::Gatekeeper;
use gleaner_llm::{MockProvider, MockReply};
use gleaner_pipeline::{AcquisitionContext, CandidateOutcome, Pipeline, PipelineConfig};
use gleaner_store::SqliteStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BASIC_OK: &str = r#"{"title":"T","summary":"S","published_date":"2025-02-24T09:30"}"#;

fn summary_with(words: &[&str]) -> String {
    let mut text = String::from("The long summary ");
    for word in words {
        text.push_str(word);
        text.push(' ');
    }
    while text.len() < 1000 {
        text.push_str("filler ");
    }
    text
}

fn detailed_json(summary: &str, keywords: &[&str]) -> String {
    serde_json::json!({ "summary": summary, "keywords": keywords }).to_string()
}

/// Serves `<p>` + the URL path, so prompts can be told apart by page
struct EchoFetcher {
    delay: Option<Duration>,
}

#[async_trait]
impl ContentFetcher for EchoFetcher {
    type Error = String;

    async fn fetch(&self, url: &str) -> Result<String, String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if url.contains("unreachable") {
            return Err(format!("connection refused: {}", url));
        }
        Ok(format!("<p>page {}</p>", url))
    }
}

struct StripTags;

impl ContentRenderer for StripTags {
    fn render(&self, markup: &str) -> String {
        markup.replace("<p>", "").replace("</p>", "")
    }
}

fn pipeline_with<R: ArticleRepository>(
    llm: MockProvider,
    repository: Arc<Mutex<R>>,
    fetcher: EchoFetcher,
    config: PipelineConfig,
) -> Pipeline<EchoFetcher, MockProvider, R> {
    let ctx = AcquisitionContext::new(
        fetcher,
        StripTags,
        OracleClient::new(llm, OracleConfig::default()),
        Gatekeeper::default(),
        repository,
        config,
    )
    .unwrap();
    Pipeline::new(ctx)
}

fn pipeline(
    llm: MockProvider,
    store: Arc<Mutex<SqliteStore>>,
) -> Pipeline<EchoFetcher, MockProvider, SqliteStore> {
    pipeline_with(llm, store, EchoFetcher { delay: None }, PipelineConfig::default())
}

fn store() -> Arc<Mutex<SqliteStore>> {
    Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap()))
}

#[tokio::test]
async fn test_end_to_end_single_article() {
    let summary = summary_with(&["Tokyo", "rail", "budget", "council"]);
    let llm = MockProvider::default()
        .then(BASIC_OK)
        .then(detailed_json(&summary, &["tokyo", "Rail", "budget", "council", "absent"]));
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://news.example/a.html")
        .await;

    let record_id = match report.outcome {
        CandidateOutcome::Persisted { record_id } => record_id,
        other => panic!("expected persisted, got {:?}", other),
    };
    assert_eq!(llm.call_count(), 2);
    assert_eq!(report.basic_attempts, 1);
    assert_eq!(report.detailed_attempts, 1);

    let store = store.lock().unwrap();
    assert_eq!(store.article_count().unwrap(), 1);
    let stored = store.get_article(record_id).unwrap().unwrap();
    assert_eq!(stored.record.title, "T");
    assert_eq!(stored.record.short_summary, "S");
    assert_eq!(stored.record.long_summary.as_deref(), Some(summary.as_str()));
    assert_eq!(stored.record.body, "page https://news.example/a.html");
    assert_eq!(
        stored.record.published_at.map(|t| t.format("%Y-%m-%dT%H:%M").to_string()),
        Some("2025-02-24T09:30".to_string())
    );
}

#[tokio::test]
async fn test_basic_never_validating_is_skipped_without_save() {
    let llm = MockProvider::default().when(
        "\"published_date\"",
        vec![
            MockReply::from("not json at all"),
            MockReply::from(r#"{"title":"T","summary":"S"}"#),
            MockReply::from(r#"{"title":"T","summary":"S","published_date":"not-a-date"}"#),
        ],
    );
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://news.example/b.html")
        .await;

    assert_eq!(report.basic_attempts, 3);
    assert_eq!(report.detailed_attempts, 0);
    assert_eq!(llm.call_count(), 3);
    match report.outcome {
        CandidateOutcome::Skipped { stage, reason } => {
            assert_eq!(stage, Stage::Basic);
            assert!(reason.contains("not-a-date"), "reason: {}", reason);
        }
        other => panic!("expected skip, got {:?}", other),
    }
    assert_eq!(store.lock().unwrap().article_count().unwrap(), 0);
}

#[tokio::test]
async fn test_basic_recovers_on_second_attempt() {
    let summary = summary_with(&["a1", "b2", "c3", "d4", "e5"]);
    let llm = MockProvider::default()
        .when(
            "\"published_date\"",
            vec![MockReply::from(""), MockReply::from(BASIC_OK)],
        )
        .when(
            "\"keywords\"",
            vec![MockReply::from(detailed_json(&summary, &["a1", "b2", "c3", "d4", "e5"]))],
        );
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://news.example/c.html")
        .await;

    assert_eq!(report.outcome.label(), "persisted");
    assert_eq!(report.basic_attempts, 2);
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn test_wrong_keyword_count_burns_detailed_budget() {
    let summary = summary_with(&["one", "two", "three", "four"]);
    let llm = MockProvider::default()
        .when("\"published_date\"", vec![MockReply::from(BASIC_OK)])
        .when(
            "\"keywords\"",
            vec![MockReply::from(detailed_json(&summary, &["one", "two", "three", "four"]))],
        )
        .when("plain text", vec![MockReply::from(summary.as_str())]);
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://news.example/d.html")
        .await;

    assert_eq!(report.detailed_attempts, 5);
    assert_eq!(llm.call_count(), 6);
    assert!(matches!(
        report.outcome,
        CandidateOutcome::Skipped { stage: Stage::Detailed, .. }
    ));
    assert_eq!(store.lock().unwrap().article_count().unwrap(), 0);

    // Retained keywords were offered back verbatim on every retry
    let retries: Vec<_> = llm
        .prompts()
        .into_iter()
        .filter(|p| p.system.contains("plain text"))
        .collect();
    assert_eq!(retries.len(), 4);
    assert!(retries
        .iter()
        .all(|p| p.system.contains("one, two, three, four")));
}

#[tokio::test]
async fn test_detailed_retry_reuses_keywords_and_succeeds() {
    let weak = summary_with(&["alpha", "beta"]);
    let strong = summary_with(&["alpha", "beta", "gamma", "delta"]);
    let llm = MockProvider::default()
        .when("\"published_date\"", vec![MockReply::from(BASIC_OK)])
        .when(
            "\"keywords\"",
            vec![MockReply::from(detailed_json(
                &weak,
                &["alpha", "beta", "gamma", "delta", "epsilon"],
            ))],
        )
        .when("plain text", vec![MockReply::from(strong.as_str())]);
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://news.example/e.html")
        .await;

    let record_id = match report.outcome {
        CandidateOutcome::Persisted { record_id } => record_id,
        other => panic!("expected persisted, got {:?}", other),
    };
    assert_eq!(report.detailed_attempts, 2);
    assert_eq!(llm.call_count(), 3);

    let stored = store.lock().unwrap().get_article(record_id).unwrap().unwrap();
    assert_eq!(stored.record.long_summary.as_deref(), Some(strong.as_str()));
}

#[tokio::test]
async fn test_unparsed_first_detailed_attempt_asks_for_json_again() {
    let summary = summary_with(&["k1", "k2", "k3", "k4", "k5"]);
    let llm = MockProvider::default()
        .when("\"published_date\"", vec![MockReply::from(BASIC_OK)])
        .when(
            "\"keywords\"",
            vec![
                MockReply::from("```json\n{\"summary\": \"cut off"),
                MockReply::from(detailed_json(&summary, &["k1", "k2", "k3", "k4", "k5"])),
            ],
        );
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://news.example/f.html")
        .await;

    assert_eq!(report.outcome.label(), "persisted");
    assert_eq!(report.detailed_attempts, 2);
    assert!(llm
        .prompts()
        .iter()
        .all(|p| !p.system.contains("plain text")));
}

#[tokio::test]
async fn test_fetch_failure_skips_without_oracle() {
    let llm = MockProvider::default();
    let store = store();

    let report = pipeline(llm.clone(), Arc::clone(&store))
        .process("https://unreachable.example/a.html")
        .await;

    assert_eq!(llm.call_count(), 0);
    match report.outcome {
        CandidateOutcome::Skipped { stage, reason } => {
            assert_eq!(stage, Stage::Fetch);
            assert!(reason.contains("connection refused"));
        }
        other => panic!("expected skip, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_fetch_timeout_is_a_fetch_failure() {
    let llm = MockProvider::default();
    let config = PipelineConfig {
        fetch_timeout_secs: 1,
        ..Default::default()
    };
    let report = pipeline_with(
        llm.clone(),
        store(),
        EchoFetcher {
            delay: Some(Duration::from_secs(5)),
        },
        config,
    )
    .process("https://news.example/slow.html")
    .await;

    assert!(matches!(
        report.outcome,
        CandidateOutcome::Skipped { stage: Stage::Fetch, ref reason } if reason.contains("timed out")
    ));
    assert_eq!(llm.call_count(), 0);
}

#[derive(Default)]
struct FailingRepository {
    save_calls: usize,
}

impl ArticleRepository for FailingRepository {
    type Error = String;

    fn save(&mut self, _record: &ArticleRecord) -> Result<RecordId, String> {
        self.save_calls += 1;
        Err("database is locked".to_string())
    }

    fn get_article(&self, _id: RecordId) -> Result<Option<StoredArticle>, String> {
        Ok(None)
    }

    fn list_articles(&self, _limit: usize) -> Result<Vec<StoredArticle>, String> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_write_error_is_reported_once() {
    let summary = summary_with(&["a1", "b2", "c3", "d4"]);
    let llm = MockProvider::default()
        .then(BASIC_OK)
        .then(detailed_json(&summary, &["a1", "b2", "c3", "d4", "zz"]));
    let repository = Arc::new(Mutex::new(FailingRepository::default()));

    let report = pipeline_with(
        llm.clone(),
        Arc::clone(&repository),
        EchoFetcher { delay: None },
        PipelineConfig::default(),
    )
    .process("https://news.example/g.html")
    .await;

    assert_eq!(
        report.outcome,
        CandidateOutcome::WriteFailed {
            error: "database is locked".to_string()
        }
    );
    assert_eq!(repository.lock().unwrap().save_calls, 1);
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_batch_partitions_every_candidate() {
    let summary = summary_with(&["w1", "w2", "w3", "w4", "w5"]);
    let good_detailed = detailed_json(&summary, &["w1", "w2", "w3", "w4", "w5"]);
    let llm = MockProvider::default()
        .when("bad-", vec![MockReply::from(r#"{"published_date":""}"#)])
        .when("\"published_date\"", vec![MockReply::from(BASIC_OK)])
        .when("\"keywords\"", vec![MockReply::from(good_detailed.as_str())]);
    let store = store();
    let pipeline = pipeline_with(
        llm,
        Arc::clone(&store),
        EchoFetcher { delay: None },
        PipelineConfig {
            concurrency: 2,
            ..Default::default()
        },
    );

    let urls = vec![
        "https://news.example/good-1.html".to_string(),
        "https://news.example/bad-1.html".to_string(),
        "https://unreachable.example/x.html".to_string(),
        "https://news.example/good-2.html".to_string(),
        "https://news.example/good-3.html".to_string(),
    ];
    let report = pipeline.run_batch(urls).await;

    assert_eq!(report.total(), 5);
    assert_eq!(report.persisted.len(), 3);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.write_failed.is_empty());

    let by_stage = report.skipped_by_stage();
    assert_eq!(by_stage.get(&Stage::Basic), Some(&1));
    assert_eq!(by_stage.get(&Stage::Fetch), Some(&1));
    assert_eq!(store.lock().unwrap().article_count().unwrap(), 3);
}

#[tokio::test]
async fn test_empty_batch() {
    let report = pipeline(MockProvider::default(), store()).run_batch(Vec::new()).await;
    assert_eq!(report.total(), 0);
}
