//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Gleaner - discover fresh articles and extract structured records from them.
#[derive(Debug, Parser)]
#[command(name = "gleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GLEANER_CONFIG")]
    pub config: Option<String>,

    /// Database path (overrides the configuration file)
    #[arg(long, global = true, env = "GLEANER_DB")]
    pub database: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (identifiers only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover and process every registered source once
    Run,

    /// Discover and process every registered source on an interval until Ctrl+C
    Watch(WatchArgs),

    /// Run the given URLs through the pipeline, skipping discovery
    Ingest(IngestArgs),

    /// Check whether pages would pass the recency probe
    Probe(ProbeArgs),

    /// Manage registered sources
    Source(SourceArgs),

    /// Inspect persisted articles
    Articles(ArticlesArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Minutes between runs (overrides the configuration file)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Article URLs
    #[arg(required = true)]
    pub urls: Vec<String>,
}

/// Arguments for the probe command.
#[derive(Debug, Parser)]
pub struct ProbeArgs {
    /// Page URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Recency window in days (overrides the configuration file)
    #[arg(short, long)]
    pub days: Option<i64>,
}

/// Arguments for source management.
#[derive(Debug, Parser)]
pub struct SourceArgs {
    #[command(subcommand)]
    pub action: SourceAction,
}

/// Source management actions.
#[derive(Debug, Subcommand)]
pub enum SourceAction {
    /// Register a source root URL
    Add {
        /// Root URL, e.g. https://news.example/
        url: String,
    },

    /// List registered sources
    List,
}

/// Arguments for article inspection.
#[derive(Debug, Parser)]
pub struct ArticlesArgs {
    #[command(subcommand)]
    pub action: ArticlesAction,
}

/// Article inspection actions.
#[derive(Debug, Subcommand)]
pub enum ArticlesAction {
    /// List the most recently written articles
    List {
        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one article in full
    Show {
        /// Article identifier
        id: String,
    },
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["gleaner", "run"]);
        assert!(matches!(cli.command, Command::Run));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_ingest_requires_urls() {
        assert!(Cli::try_parse_from(["gleaner", "ingest"]).is_err());

        let cli = Cli::parse_from(["gleaner", "ingest", "https://a.example/1", "https://a.example/2"]);
        match cli.command {
            Command::Ingest(args) => assert_eq!(args.urls.len(), 2),
            _ => panic!("Expected Ingest command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["gleaner", "-vv", "--format", "json", "source", "list"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(
            cli.command,
            Command::Source(SourceArgs { action: SourceAction::List })
        ));
    }

    #[test]
    fn test_articles_list_default_limit() {
        let cli = Cli::parse_from(["gleaner", "articles", "list"]);
        match cli.command {
            Command::Articles(ArticlesArgs {
                action: ArticlesAction::List { limit },
            }) => assert_eq!(limit, 20),
            _ => panic!("Expected Articles List command"),
        }
    }
}
