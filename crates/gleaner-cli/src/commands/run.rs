//! Run and watch command implementations.

use crate::cli::WatchArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::services::Services;
use gleaner_pipeline::PipelineError;

/// Execute the run command: one discovery and acquisition pass.
pub async fn execute_run(services: &Services, formatter: &Formatter) -> Result<()> {
    let sources = services.sources()?;
    if sources.is_empty() {
        eprintln!(
            "{}",
            formatter.warning("No sources registered. Use 'gleaner source add <url>' first.")
        );
        return Ok(());
    }

    let mut worker = services.worker()?;
    let runs = worker.run_once(&sources).await;
    println!("{}", formatter.format_runs(&runs)?);
    tracing::info!("Run finished:\n{}", worker.metrics().summary());

    Ok(())
}

/// Execute the watch command: repeat runs on an interval until Ctrl+C.
pub async fn execute_watch(
    args: WatchArgs,
    services: Services,
    formatter: &Formatter,
) -> Result<()> {
    let services = match args.interval {
        Some(minutes) => {
            let mut config = services.config().clone();
            config.pipeline.run_interval_minutes = minutes;
            Services::open(config)?
        }
        None => services,
    };

    let sources = services.sources()?;
    eprintln!(
        "{}",
        formatter.info(&format!(
            "Watching {} source(s) every {} minute(s). Press Ctrl+C to stop.",
            sources.len(),
            services.config().pipeline.run_interval_minutes
        ))
    );

    // Reloaded every tick so sources added while watching join the next run
    let load_sources = || {
        services
            .sources()
            .map_err(|e| PipelineError::Sources(e.to_string()))
    };
    let mut worker = services.worker()?;
    worker.run(load_sources).await?;
    println!("{}", worker.metrics().summary());

    Ok(())
}
