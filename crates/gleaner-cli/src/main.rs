//! Gleaner CLI - discover fresh articles and extract structured records.

use clap::Parser;
use gleaner_cli::commands;
use gleaner_cli::{init_logging, Cli, Command, Config, Formatter, Services};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> gleaner_cli::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let mut config = Config::load_from(&config_path)?;
    if let Some(database) = cli.database {
        config.database_path = database.into();
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?
        }
        Command::Run => commands::execute_run(&Services::open(config)?, &formatter).await?,
        Command::Watch(args) => {
            commands::execute_watch(args, Services::open(config)?, &formatter).await?
        }
        Command::Ingest(args) => {
            commands::execute_ingest(args, &Services::open(config)?, &formatter).await?
        }
        Command::Probe(args) => {
            commands::execute_probe(args, &Services::open(config)?, &formatter).await?
        }
        Command::Source(args) => {
            commands::execute_source(args, &Services::open(config)?, &formatter)?
        }
        Command::Articles(args) => {
            commands::execute_articles(args, &Services::open(config)?, &formatter)?
        }
    }

    Ok(())
}
