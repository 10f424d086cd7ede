//! Probe command implementation.

use crate::cli::ProbeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;
use gleaner_frontier::FrontierConfig;

/// Execute the probe command: classify pages against the recency window.
pub async fn execute_probe(
    args: ProbeArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let window = probe_window(args.days, &services.config().frontier)?;
    let probe = services.probe(window)?;
    let mut reports = Vec::with_capacity(args.urls.len());
    for url in &args.urls {
        reports.push(probe.inspect(url).await);
    }

    println!("{}", formatter.format_probes(&reports)?);
    Ok(())
}

/// Window from `--days`, checked like the configured one.
fn probe_window(days: Option<i64>, frontier: &FrontierConfig) -> Result<chrono::Duration> {
    let Some(days) = days else {
        return Ok(frontier.recency_window());
    };
    let overridden = FrontierConfig {
        recency_window_days: days,
        ..frontier.clone()
    };
    overridden
        .validate()
        .map_err(|e| CliError::InvalidInput(format!("--days: {}", e)))?;
    Ok(overridden.recency_window())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_frontier::MAX_RECENCY_WINDOW_DAYS;

    #[test]
    fn test_probe_window_override() {
        let frontier = FrontierConfig::default();
        assert_eq!(probe_window(None, &frontier).unwrap(), chrono::Duration::days(3));
        assert_eq!(probe_window(Some(10), &frontier).unwrap(), chrono::Duration::days(10));
        assert!(probe_window(Some(-1), &frontier).is_err());
        assert!(probe_window(Some(MAX_RECENCY_WINDOW_DAYS + 1), &frontier).is_err());
    }
}
