//! Pipeline orchestrator: drives one candidate from fetch to persist or skip

use crate::context::AcquisitionContext;
use crate::state::{transition, PipelineState};
use chrono::NaiveDateTime;
use gleaner_domain::traits::{ArticleRepository, ContentFetcher, LlmProvider};
use gleaner_domain::{
    ArticleRecord, BasicFields, Candidate, DetailedFields, RecordId, Stage, StageStatus,
};
use gleaner_extractor::ExtractorError;
use std::fmt;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// How one candidate ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// The record was written
    Persisted {
        /// Identifier assigned by the repository
        record_id: RecordId,
    },
    /// Dropped without a write
    Skipped {
        /// Stage that gave up
        stage: Stage,
        /// Last failure seen at that stage
        reason: String,
    },
    /// Both stages succeeded but the repository refused the record
    WriteFailed {
        /// Repository error message
        error: String,
    },
}

impl CandidateOutcome {
    /// Short lowercase label for reports
    pub fn label(&self) -> &'static str {
        match self {
            CandidateOutcome::Persisted { .. } => "persisted",
            CandidateOutcome::Skipped { .. } => "skipped",
            CandidateOutcome::WriteFailed { .. } => "write_failed",
        }
    }
}

impl fmt::Display for CandidateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOutcome::Persisted { record_id } => write!(f, "persisted as {}", record_id),
            CandidateOutcome::Skipped { stage, reason } => {
                write!(f, "skipped at {} stage: {}", stage, reason)
            }
            CandidateOutcome::WriteFailed { error } => write!(f, "write failed: {}", error),
        }
    }
}

/// Outcome of one candidate plus the oracle calls it cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    /// Candidate URL
    pub url: String,
    /// Terminal outcome
    pub outcome: CandidateOutcome,
    /// Basic extraction attempts made
    pub basic_attempts: u32,
    /// Detailed extraction attempts made
    pub detailed_attempts: u32,
}

impl CandidateReport {
    /// Total oracle invocations for this candidate
    pub fn oracle_calls(&self) -> u32 {
        self.basic_attempts + self.detailed_attempts
    }
}

/// Drives candidates through the acquisition state machine
///
/// Each call to [`Pipeline::process`] owns its [`Candidate`] from start to
/// finish; nothing is shared between candidates except the collaborators in
/// the context. The repository is called at most once per candidate, and only
/// when both extraction stages ended in `Success`.
pub struct Pipeline<F, L: LlmProvider, R> {
    ctx: AcquisitionContext<F, L, R>,
}

impl<F, L: LlmProvider, R> Clone for Pipeline<F, L, R> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
        }
    }
}

/// Per-candidate scratch state that lives only for one `process` call
#[derive(Default)]
struct Progress {
    body: String,
    basic_reply: Option<Result<BasicFields, ExtractorError>>,
    detailed_reply: Option<Result<DetailedFields, ExtractorError>>,
    basic: Option<(BasicFields, NaiveDateTime)>,
    detailed: Option<DetailedFields>,
    skipped_at: Option<(Stage, String)>,
    written: Option<CandidateOutcome>,
}

impl<F, L, R> Pipeline<F, L, R>
where
    F: ContentFetcher,
    L: LlmProvider,
    R: ArticleRepository,
{
    /// Create a pipeline over the given context
    pub fn new(ctx: AcquisitionContext<F, L, R>) -> Self {
        Self { ctx }
    }

    /// The shared collaborators
    pub fn context(&self) -> &AcquisitionContext<F, L, R> {
        &self.ctx
    }

    /// Run one URL through the pipeline until it is persisted or skipped
    pub async fn process(&self, url: &str) -> CandidateReport {
        let mut candidate = Candidate::new(url, self.ctx.config.budget());
        let mut progress = Progress::default();
        let mut state = PipelineState::Fetching;

        while !state.is_terminal() {
            let status = match state {
                PipelineState::Fetching => self.fetch(&candidate, &mut progress).await,
                PipelineState::ExtractingBasic => {
                    self.extract_basic(&mut candidate, &mut progress).await
                }
                PipelineState::ValidatingBasic => self.validate_basic(&mut candidate, &mut progress),
                PipelineState::ExtractingDetailed => {
                    self.extract_detailed(&mut candidate, &mut progress).await
                }
                PipelineState::ValidatingDetailed => {
                    self.validate_detailed(&mut candidate, &mut progress)
                }
                PipelineState::Persisting => self.persist(&candidate, &mut progress),
                PipelineState::Persisted | PipelineState::Skipped => break,
            };
            state = transition(state, status);
        }

        let outcome = match state {
            PipelineState::Persisted => progress.written.take(),
            _ => None,
        }
        .unwrap_or_else(|| {
            let (stage, reason) = progress
                .skipped_at
                .take()
                .unwrap_or((Stage::Persist, "candidate did not complete".to_string()));
            warn!(url, stage = %stage, reason = %reason, "Skipped candidate");
            CandidateOutcome::Skipped { stage, reason }
        });

        CandidateReport {
            url: url.to_string(),
            outcome,
            basic_attempts: candidate.basic_attempts(),
            detailed_attempts: candidate.detailed_attempts(),
        }
    }

    async fn fetch(&self, candidate: &Candidate, progress: &mut Progress) -> StageStatus {
        let url = candidate.url();
        debug!(url, stage = %Stage::Fetch, "Fetching");

        let result = match timeout(self.ctx.config.fetch_timeout(), self.ctx.fetcher.fetch(url)).await {
            Ok(Ok(markup)) => Ok(markup),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "fetch timed out after {}s",
                self.ctx.config.fetch_timeout_secs
            )),
        };

        match result {
            Ok(markup) => {
                progress.body = self.ctx.renderer.render(&markup);
                StageStatus::Success
            }
            Err(reason) => {
                progress.skipped_at = Some((Stage::Fetch, reason));
                StageStatus::Failed
            }
        }
    }

    async fn extract_basic(&self, candidate: &mut Candidate, progress: &mut Progress) -> StageStatus {
        let Some(attempt) = candidate.start_attempt(Stage::Basic) else {
            return StageStatus::Failed;
        };
        debug!(url = candidate.url(), stage = %Stage::Basic, attempt, "Extracting");

        progress.basic_reply = Some(self.ctx.oracle.extract_basic(&progress.body).await);
        StageStatus::Success
    }

    fn validate_basic(&self, candidate: &mut Candidate, progress: &mut Progress) -> StageStatus {
        let rejection = match progress.basic_reply.take() {
            Some(Ok(fields)) => {
                let result = self.ctx.gatekeeper.validate_basic(&fields);
                match result.value {
                    Some(published_at) if result.is_accepted() => {
                        progress.basic = Some((fields, published_at));
                        candidate.set_status(Stage::Basic, StageStatus::Success);
                        return StageStatus::Success;
                    }
                    _ => result.reason_summary(),
                }
            }
            Some(Err(e)) => e.to_string(),
            None => "no basic extraction attempt left".to_string(),
        };

        self.reject(candidate, progress, Stage::Basic, rejection)
    }

    async fn extract_detailed(
        &self,
        candidate: &mut Candidate,
        progress: &mut Progress,
    ) -> StageStatus {
        let Some(attempt) = candidate.start_attempt(Stage::Detailed) else {
            return StageStatus::Failed;
        };
        debug!(
            url = candidate.url(),
            stage = %Stage::Detailed,
            attempt,
            retained = candidate.retained_keywords().is_some(),
            "Extracting"
        );

        let reply = self
            .ctx
            .oracle
            .extract_detailed(&progress.body, candidate.retained_keywords())
            .await;

        if let Ok(fields) = &reply {
            if candidate.retain_keywords(fields.keywords.clone()) {
                debug!(url = candidate.url(), keywords = ?fields.keywords, "Retained keywords");
            }
        }

        progress.detailed_reply = Some(reply);
        StageStatus::Success
    }

    fn validate_detailed(&self, candidate: &mut Candidate, progress: &mut Progress) -> StageStatus {
        let rejection = match progress.detailed_reply.take() {
            Some(Ok(fields)) => {
                let result = self.ctx.gatekeeper.validate_detailed(&fields);
                if result.is_accepted() {
                    progress.detailed = Some(fields);
                    candidate.set_status(Stage::Detailed, StageStatus::Success);
                    return StageStatus::Success;
                }
                result.reason_summary()
            }
            Some(Err(e)) => e.to_string(),
            None => "no detailed extraction attempt left".to_string(),
        };

        self.reject(candidate, progress, Stage::Detailed, rejection)
    }

    /// Classify a rejected attempt as `Retry` or `Failed` by remaining budget
    fn reject(
        &self,
        candidate: &mut Candidate,
        progress: &mut Progress,
        stage: Stage,
        reason: String,
    ) -> StageStatus {
        let status = if candidate.has_budget(stage) {
            StageStatus::Retry
        } else {
            StageStatus::Failed
        };
        let attempt = match stage {
            Stage::Basic => candidate.basic_attempts(),
            _ => candidate.detailed_attempts(),
        };
        warn!(
            url = candidate.url(),
            stage = %stage,
            attempt,
            status = %status,
            reason = %reason,
            "Rejected"
        );

        candidate.set_status(stage, status);
        if status == StageStatus::Failed {
            progress.skipped_at = Some((stage, reason));
        }
        status
    }

    fn persist(&self, candidate: &Candidate, progress: &mut Progress) -> StageStatus {
        let (Some((basic, published_at)), Some(detailed)) =
            (progress.basic.take(), progress.detailed.take())
        else {
            progress.skipped_at = Some((Stage::Persist, "extracted fields missing".to_string()));
            return StageStatus::Failed;
        };
        if !candidate.ready_to_persist() {
            progress.skipped_at = Some((Stage::Persist, "stages not both successful".to_string()));
            return StageStatus::Failed;
        }

        let record = ArticleRecord {
            title: basic.title_or_empty().to_string(),
            short_summary: basic.short_summary_or_empty().to_string(),
            long_summary: Some(detailed.long_summary),
            body: std::mem::take(&mut progress.body),
            url: candidate.url().to_string(),
            published_at: Some(published_at),
        };

        match self.save(&record) {
            Ok(record_id) => {
                info!(url = candidate.url(), record_id = %record_id, "Persisted article");
                progress.written = Some(CandidateOutcome::Persisted { record_id });
                StageStatus::Success
            }
            Err(e) => {
                error!(url = candidate.url(), "Failed to persist article: {}", e);
                progress.written = Some(CandidateOutcome::WriteFailed { error: e });
                StageStatus::Failed
            }
        }
    }

    fn save(&self, record: &ArticleRecord) -> Result<RecordId, String> {
        let mut repository = self
            .ctx
            .repository
            .lock()
            .map_err(|_| "repository lock poisoned".to_string())?;
        repository.save(record).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineConfig;
    use async_trait::async_trait;
    use gleaner_domain::traits::ContentRenderer;
    use gleaner_domain::StoredArticle;
    use gleaner_extractor::{OracleClient, OracleConfig};
    use gleaner_gatekeeper::Gatekeeper;
    use gleaner_llm::MockProvider;
    use std::sync::{Arc, Mutex};

    struct StaticPage;

    #[async_trait]
    impl ContentFetcher for StaticPage {
        type Error = String;

        async fn fetch(&self, url: &str) -> Result<String, String> {
            if url.contains("missing") {
                return Err(format!("404 for {}", url));
            }
            Ok("<p>article body</p>".to_string())
        }
    }

    struct Passthrough;

    impl ContentRenderer for Passthrough {
        fn render(&self, markup: &str) -> String {
            markup.to_string()
        }
    }

    #[derive(Default)]
    struct VecRepository {
        saved: Vec<ArticleRecord>,
    }

    impl ArticleRepository for VecRepository {
        type Error = String;

        fn save(&mut self, record: &ArticleRecord) -> Result<RecordId, String> {
            self.saved.push(record.clone());
            Ok(RecordId::new())
        }

        fn get_article(&self, _id: RecordId) -> Result<Option<StoredArticle>, String> {
            Ok(None)
        }

        fn list_articles(&self, _limit: usize) -> Result<Vec<StoredArticle>, String> {
            Ok(Vec::new())
        }
    }

    fn pipeline(
        llm: MockProvider,
        repository: Arc<Mutex<VecRepository>>,
    ) -> Pipeline<StaticPage, MockProvider, VecRepository> {
        let ctx = AcquisitionContext::new(
            StaticPage,
            Passthrough,
            OracleClient::new(llm, OracleConfig::default()),
            Gatekeeper::default(),
            repository,
            PipelineConfig::default(),
        )
        .unwrap();
        Pipeline::new(ctx)
    }

    #[tokio::test]
    async fn test_fetch_failure_spends_no_budget() {
        let llm = MockProvider::default();
        let repository = Arc::new(Mutex::new(VecRepository::default()));
        let report = pipeline(llm.clone(), Arc::clone(&repository))
            .process("https://a.example/missing")
            .await;

        assert!(matches!(
            report.outcome,
            CandidateOutcome::Skipped { stage: Stage::Fetch, .. }
        ));
        assert_eq!(report.oracle_calls(), 0);
        assert_eq!(llm.call_count(), 0);
        assert!(repository.lock().unwrap().saved.is_empty());
    }

    #[tokio::test]
    async fn test_provider_errors_count_as_attempts() {
        let llm = MockProvider::default()
            .then_error("down")
            .then_error("down")
            .then_error("down");
        let repository = Arc::new(Mutex::new(VecRepository::default()));
        let report = pipeline(llm.clone(), Arc::clone(&repository))
            .process("https://a.example/1")
            .await;

        assert_eq!(report.basic_attempts, 3);
        assert_eq!(report.detailed_attempts, 0);
        match report.outcome {
            CandidateOutcome::Skipped { stage, reason } => {
                assert_eq!(stage, Stage::Basic);
                assert!(reason.contains("down"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(repository.lock().unwrap().saved.is_empty());
    }

    #[tokio::test]
    async fn test_record_carries_rendered_body_and_both_stages() {
        let llm = MockProvider::default()
            .then(r#"{"title":"Title","summary":"Short","published_date":"2025-02-24T09:30"}"#)
            .then(r#"{"summary":"alpha beta gamma delta","keywords":["alpha","beta","gamma","delta","omega"]}"#);
        let repository = Arc::new(Mutex::new(VecRepository::default()));
        let report = pipeline(llm, Arc::clone(&repository))
            .process("https://a.example/1")
            .await;

        assert_eq!(report.outcome.label(), "persisted");
        let saved = &repository.lock().unwrap().saved;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "Title");
        assert_eq!(saved[0].short_summary, "Short");
        assert_eq!(saved[0].body, "<p>article body</p>");
        assert_eq!(saved[0].url, "https://a.example/1");
        assert_eq!(
            saved[0].long_summary.as_deref(),
            Some("alpha beta gamma delta")
        );
    }

    #[test]
    fn test_outcome_display() {
        let outcome = CandidateOutcome::Skipped {
            stage: Stage::Detailed,
            reason: "too few keywords".to_string(),
        };
        assert_eq!(outcome.to_string(), "skipped at detailed stage: too few keywords");
    }
}
