//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;

/// Execute the ingest command: run URLs through the pipeline directly.
pub async fn execute_ingest(
    args: IngestArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let urls = validate_urls(args.urls)?;
    let pipeline = services.pipeline()?;
    let report = pipeline.run_batch(urls).await;

    println!("{}", formatter.format_batch(&report)?);
    if !report.write_failed.is_empty() {
        eprintln!(
            "{}",
            formatter.error(&format!("{} article(s) could not be written", report.write_failed.len()))
        );
    }

    Ok(())
}

/// Reject anything that is not an absolute http(s) URL; drop repeats.
fn validate_urls(urls: Vec<String>) -> Result<Vec<String>> {
    let mut seen = Vec::with_capacity(urls.len());
    for url in urls {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CliError::InvalidInput(format!(
                "'{}' is not an http(s) URL",
                url
            )));
        }
        if !seen.contains(&url) {
            seen.push(url);
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_urls() {
        let urls = validate_urls(vec![
            "https://a.example/1".to_string(),
            " https://a.example/1 ".to_string(),
            "http://b.example/2".to_string(),
        ])
        .unwrap();
        assert_eq!(urls, vec!["https://a.example/1", "http://b.example/2"]);
    }

    #[test]
    fn test_validate_urls_rejects_relative() {
        assert!(validate_urls(vec!["/news/1.html".to_string()]).is_err());
    }
}
