//! Bounded worker pool over a candidate batch

use crate::orchestrator::{CandidateOutcome, CandidateReport, Pipeline};
use gleaner_domain::traits::{ArticleRepository, ContentFetcher, LlmProvider};
use gleaner_domain::Stage;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Partition of a batch into persisted, skipped and write-failed candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Candidates whose record was written
    pub persisted: Vec<CandidateReport>,
    /// Candidates dropped without a write
    pub skipped: Vec<CandidateReport>,
    /// Candidates the repository refused
    pub write_failed: Vec<CandidateReport>,
}

impl BatchReport {
    /// File a candidate report under its outcome
    pub fn push(&mut self, report: CandidateReport) {
        match report.outcome {
            CandidateOutcome::Persisted { .. } => self.persisted.push(report),
            CandidateOutcome::Skipped { .. } => self.skipped.push(report),
            CandidateOutcome::WriteFailed { .. } => self.write_failed.push(report),
        }
    }

    /// Number of candidates accounted for
    pub fn total(&self) -> usize {
        self.persisted.len() + self.skipped.len() + self.write_failed.len()
    }

    /// All reports, persisted first
    pub fn reports(&self) -> impl Iterator<Item = &CandidateReport> {
        self.persisted
            .iter()
            .chain(self.skipped.iter())
            .chain(self.write_failed.iter())
    }

    /// Skip counts keyed by the stage that gave up
    pub fn skipped_by_stage(&self) -> HashMap<Stage, usize> {
        let mut counts = HashMap::new();
        for report in &self.skipped {
            if let CandidateOutcome::Skipped { stage, .. } = report.outcome {
                *counts.entry(stage).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Merge another report into this one
    pub fn extend(&mut self, other: BatchReport) {
        self.persisted.extend(other.persisted);
        self.skipped.extend(other.skipped);
        self.write_failed.extend(other.write_failed);
    }
}

impl<F, L, R> Pipeline<F, L, R>
where
    F: ContentFetcher + 'static,
    L: LlmProvider + 'static,
    R: ArticleRepository + Send + 'static,
{
    /// Process a batch with at most `concurrency` candidates in flight
    ///
    /// A single candidate's failure never aborts the batch. Completion order
    /// is not the input order.
    pub async fn run_batch(&self, urls: Vec<String>) -> BatchReport {
        let limit = self.context().config.concurrency.max(1);
        let mut report = BatchReport::default();
        let mut tasks = JoinSet::new();

        for url in urls {
            if tasks.len() >= limit {
                Self::collect_one(&mut tasks, &mut report).await;
            }
            let pipeline = self.clone();
            tasks.spawn(async move { pipeline.process(&url).await });
        }
        while !tasks.is_empty() {
            Self::collect_one(&mut tasks, &mut report).await;
        }

        info!(
            persisted = report.persisted.len(),
            skipped = report.skipped.len(),
            write_failed = report.write_failed.len(),
            "Batch complete"
        );
        report
    }

    async fn collect_one(tasks: &mut JoinSet<CandidateReport>, report: &mut BatchReport) {
        match tasks.join_next().await {
            Some(Ok(candidate)) => report.push(candidate),
            Some(Err(e)) => error!("Candidate task failed: {}", e),
            None => {}
        }
    }
}
