//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use gleaner_domain::{Source, StoredArticle, PUBLISHED_AT_FORMAT};
use gleaner_frontier::ProbeReport;
use gleaner_pipeline::{BatchReport, CandidateOutcome, CandidateReport, SourceRun};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of articles.
    pub fn format_articles(&self, articles: &[StoredArticle]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = articles.iter().map(article_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => {
                if articles.is_empty() {
                    return Ok(self.colorize("No articles found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Published", "Title", "URL"]);
                for article in articles {
                    let id = article.id.to_string();
                    builder.push_record([
                        id[..8].to_string(), // Truncate ID for readability
                        published(article),
                        truncate(&article.record.title, 48),
                        article.record.url.clone(),
                    ]);
                }
                Ok(self.render_table(builder))
            }
            OutputFormat::Quiet => Ok(articles
                .iter()
                .map(|a| a.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format one article in full.
    pub fn format_article(&self, article: &StoredArticle) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&article_json(article))?),
            OutputFormat::Quiet => Ok(article.id.to_string()),
            OutputFormat::Table => {
                let record = &article.record;
                let lines = [
                    format!("{} {}", self.colorize("ID:", "cyan"), article.id),
                    format!("{} {}", self.colorize("Title:", "cyan"), record.title),
                    format!("{} {}", self.colorize("URL:", "cyan"), record.url),
                    format!("{} {}", self.colorize("Published:", "cyan"), published(article)),
                    format!("{} {}", self.colorize("Stored:", "cyan"), article.created_at),
                    String::new(),
                    self.colorize("Summary", "cyan"),
                    record.short_summary.clone(),
                    String::new(),
                    self.colorize("Long summary", "cyan"),
                    record.long_summary.clone().unwrap_or_default(),
                ];
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format registered sources.
    pub fn format_sources(&self, sources: &[Source]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = sources
                    .iter()
                    .map(|s| serde_json::json!({ "id": s.id.0, "url": s.root_url }))
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => {
                if sources.is_empty() {
                    return Ok(self.colorize("No sources registered.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "URL"]);
                for source in sources {
                    builder.push_record([source.id.to_string(), source.root_url.clone()]);
                }
                Ok(self.render_table(builder))
            }
            OutputFormat::Quiet => Ok(sources
                .iter()
                .map(|s| s.root_url.clone())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the candidate partition of one batch.
    pub fn format_batch(&self, batch: &BatchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&batch_json(batch))?),
            OutputFormat::Quiet => Ok(persisted_ids(batch).join("\n")),
            OutputFormat::Table => {
                if batch.total() == 0 {
                    return Ok(self.colorize("No candidates processed.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["URL", "Outcome", "Basic", "Detailed", "Detail"]);
                for report in batch.reports() {
                    builder.push_record([
                        report.url.clone(),
                        self.outcome_label(&report.outcome),
                        report.basic_attempts.to_string(),
                        report.detailed_attempts.to_string(),
                        outcome_detail(&report.outcome),
                    ]);
                }
                let summary = format!(
                    "{} persisted, {} skipped, {} write failures",
                    batch.persisted.len(),
                    batch.skipped.len(),
                    batch.write_failed.len()
                );
                Ok(format!("{}\n{}", self.render_table(builder), summary))
            }
        }
    }

    /// Format a full acquisition run over several sources.
    pub fn format_runs(&self, runs: &[SourceRun]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = runs
                    .iter()
                    .map(|run| {
                        serde_json::json!({
                            "source": run.source.root_url,
                            "discovered": run.discovery.discovered,
                            "new": run.discovery.new,
                            "probed": run.discovery.probed,
                            "emitted": run.discovery.emitted,
                            "relaxed": run.discovery.relaxed,
                            "candidates": batch_json(&run.batch),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(runs
                .iter()
                .flat_map(|run| persisted_ids(&run.batch))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut sections = Vec::with_capacity(runs.len());
                for run in runs {
                    let header = format!(
                        "{} ({} discovered, {} new, {} probed, {} emitted{})",
                        run.source.root_url,
                        run.discovery.discovered,
                        run.discovery.new,
                        run.discovery.probed,
                        run.discovery.emitted,
                        if run.discovery.relaxed { ", relaxed" } else { "" }
                    );
                    sections.push(format!(
                        "{}\n{}",
                        self.colorize(&header, "cyan"),
                        self.format_batch(&run.batch)?
                    ));
                }
                Ok(sections.join("\n\n"))
            }
        }
    }

    /// Format recency probe results.
    pub fn format_probes(&self, reports: &[ProbeReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = reports
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "url": r.url,
                            "verdict": r.verdict.label(),
                            "admitted": r.verdict.admits(),
                            "published_at": r.verdict.published_at()
                                .map(|t| t.format(PUBLISHED_AT_FORMAT).to_string()),
                            "metadata": r.hint.as_ref().map(|h| format!("{:?}", h.source)),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(reports
                .iter()
                .filter(|r| r.verdict.admits())
                .map(|r| r.url.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["URL", "Verdict", "Published", "Metadata"]);
                for report in reports {
                    let verdict = if report.verdict.admits() {
                        self.colorize(report.verdict.label(), "green")
                    } else {
                        self.colorize(report.verdict.label(), "yellow")
                    };
                    builder.push_record([
                        report.url.clone(),
                        verdict,
                        report
                            .verdict
                            .published_at()
                            .map(|t| t.format(PUBLISHED_AT_FORMAT).to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        report
                            .hint
                            .as_ref()
                            .map(|h| format!("{:?}", h.source))
                            .unwrap_or_else(|| "-".to_string()),
                    ]);
                }
                Ok(self.render_table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn outcome_label(&self, outcome: &CandidateOutcome) -> String {
        let color = match outcome {
            CandidateOutcome::Persisted { .. } => "green",
            CandidateOutcome::Skipped { .. } => "yellow",
            CandidateOutcome::WriteFailed { .. } => "red",
        };
        self.colorize(outcome.label(), color)
    }

    fn render_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn published(article: &StoredArticle) -> String {
    article
        .record
        .published_at
        .map(|t| t.format(PUBLISHED_AT_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

fn article_json(article: &StoredArticle) -> serde_json::Value {
    let record = &article.record;
    serde_json::json!({
        "id": article.id.to_string(),
        "title": record.title,
        "short_summary": record.short_summary,
        "long_summary": record.long_summary,
        "url": record.url,
        "published_at": record.published_at.map(|t| t.format(PUBLISHED_AT_FORMAT).to_string()),
        "created_at": article.created_at.to_string(),
    })
}

fn outcome_detail(outcome: &CandidateOutcome) -> String {
    match outcome {
        CandidateOutcome::Persisted { record_id } => record_id.to_string(),
        CandidateOutcome::Skipped { stage, reason } => format!("{}: {}", stage, reason),
        CandidateOutcome::WriteFailed { error } => error.clone(),
    }
}

fn candidate_json(report: &CandidateReport) -> serde_json::Value {
    serde_json::json!({
        "url": report.url,
        "outcome": report.outcome.label(),
        "detail": outcome_detail(&report.outcome),
        "basic_attempts": report.basic_attempts,
        "detailed_attempts": report.detailed_attempts,
    })
}

fn batch_json(batch: &BatchReport) -> serde_json::Value {
    serde_json::json!({
        "persisted": batch.persisted.iter().map(candidate_json).collect::<Vec<_>>(),
        "skipped": batch.skipped.iter().map(candidate_json).collect::<Vec<_>>(),
        "write_failed": batch.write_failed.iter().map(candidate_json).collect::<Vec<_>>(),
    })
}

fn persisted_ids(batch: &BatchReport) -> Vec<String> {
    batch
        .persisted
        .iter()
        .filter_map(|r| match &r.outcome {
            CandidateOutcome::Persisted { record_id } => Some(record_id.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use gleaner_domain::{ArticleRecord, RecordId, SourceId, Stage};

    fn article() -> StoredArticle {
        let at = NaiveDateTime::parse_from_str("2025-02-24T09:30", PUBLISHED_AT_FORMAT).unwrap();
        StoredArticle {
            id: RecordId::new(),
            record: ArticleRecord {
                title: "Bridge reopens".to_string(),
                short_summary: "The bridge is open.".to_string(),
                long_summary: Some("Long text".to_string()),
                body: "Body".to_string(),
                url: "https://news.example/a.html".to_string(),
                published_at: Some(at),
            },
            created_at: at,
        }
    }

    fn batch() -> BatchReport {
        let mut batch = BatchReport::default();
        batch.push(CandidateReport {
            url: "https://news.example/a.html".to_string(),
            outcome: CandidateOutcome::Persisted { record_id: RecordId::new() },
            basic_attempts: 1,
            detailed_attempts: 1,
        });
        batch.push(CandidateReport {
            url: "https://news.example/b.html".to_string(),
            outcome: CandidateOutcome::Skipped {
                stage: Stage::Detailed,
                reason: "expected 5 keywords, got 4".to_string(),
            },
            basic_attempts: 1,
            detailed_attempts: 5,
        });
        batch
    }

    #[test]
    fn test_articles_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_articles(&[article()]).unwrap();
        assert!(output.contains("\"published_at\": \"2025-02-24T09:30\""));
        assert!(output.contains("short_summary"));
    }

    #[test]
    fn test_articles_table_and_empty() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_articles(&[article()]).unwrap();
        assert!(output.contains("Published"));
        assert!(output.contains("Bridge reopens"));

        let empty = formatter.format_articles(&[]).unwrap();
        assert!(empty.contains("No articles found"));
    }

    #[test]
    fn test_quiet_batch_lists_persisted_ids_only() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_batch(&batch()).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(RecordId::from_string(output.trim()).is_ok());
    }

    #[test]
    fn test_batch_table_has_summary_line() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_batch(&batch()).unwrap();
        assert!(output.contains("detailed: expected 5 keywords, got 4"));
        assert!(output.ends_with("1 persisted, 1 skipped, 0 write failures"));
    }

    #[test]
    fn test_sources_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let sources = vec![
            Source::new(SourceId(1), "https://a.example/"),
            Source::new(SourceId(2), "https://b.example/"),
        ];
        assert_eq!(
            formatter.format_sources(&sources).unwrap(),
            "https://a.example/\nhttps://b.example/"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("短い見出し", 2), "短い…");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
