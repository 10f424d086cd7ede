//! Metrics collection for acquisition runs

use crate::batch::BatchReport;
use gleaner_domain::Stage;
use std::collections::HashMap;

/// Metrics collected across batches
///
/// Tracks candidates persisted, skipped per stage, write failures, and oracle
/// calls per extraction stage.
#[derive(Debug, Clone, Default)]
pub struct PipelineMetrics {
    /// Records written
    pub persisted: usize,

    /// Candidates skipped, keyed by the stage that gave up
    pub skipped: HashMap<Stage, usize>,

    /// Records the repository refused
    pub write_failed: usize,

    /// Oracle invocations per extraction stage
    pub oracle_calls: HashMap<Stage, usize>,

    /// Batches completed
    pub batch_count: usize,

    /// Total runtime in seconds
    pub total_runtime_secs: u64,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished batch into the counters
    pub fn record_batch(&mut self, batch: &BatchReport) {
        self.batch_count += 1;
        self.persisted += batch.persisted.len();
        self.write_failed += batch.write_failed.len();

        for (stage, count) in batch.skipped_by_stage() {
            *self.skipped.entry(stage).or_insert(0) += count;
        }
        for report in batch.reports() {
            *self.oracle_calls.entry(Stage::Basic).or_insert(0) += report.basic_attempts as usize;
            *self.oracle_calls.entry(Stage::Detailed).or_insert(0) +=
                report.detailed_attempts as usize;
        }
    }

    /// Get total skips across all stages
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Get total oracle calls across both stages
    pub fn total_oracle_calls(&self) -> usize {
        self.oracle_calls.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Batches: {}", self.batch_count),
            format!("Total runtime: {}s", self.total_runtime_secs),
            format!("Persisted: {}", self.persisted),
            format!("Write failures: {}", self.write_failed),
            String::new(),
        ];

        if !self.skipped.is_empty() {
            lines.push("Skipped by stage:".to_string());
            let mut stages: Vec<_> = self.skipped.iter().collect();
            stages.sort();
            for (stage, count) in stages {
                lines.push(format!("  {}: {}", stage, count));
            }
            lines.push(format!("  Total: {}", self.total_skipped()));
            lines.push(String::new());
        }

        if !self.oracle_calls.is_empty() {
            lines.push("Oracle calls:".to_string());
            let mut stages: Vec<_> = self.oracle_calls.iter().collect();
            stages.sort();
            for (stage, count) in stages {
                lines.push(format!("  {}: {}", stage, count));
            }
            lines.push(format!("  Total: {}", self.total_oracle_calls()));
        }

        lines.join("\n")
    }
}
