//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use gleaner_extractor::OracleConfig;
use gleaner_frontier::FrontierConfig;
use gleaner_gatekeeper::ValidationConfig;
use gleaner_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, stored at `~/.gleaner/config.toml` by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Oracle provider selection
    #[serde(default)]
    pub llm: LlmSettings,

    /// Orchestrator caps, timeouts and concurrency
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Oracle client limits
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Validator thresholds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// URL discovery
    #[serde(default)]
    pub frontier: FrontierConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Which text-generation backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAi,
}

/// Oracle provider settings.
///
/// The API key itself is never stored; only the name of the environment
/// variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Backend
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL; the provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (OpenAI only)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Transport attempts per oracle call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// HTTP request timeout for the provider client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".gleaner").join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(explicit: Option<&str>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.oracle.validate().map_err(CliError::Config)?;
        self.validation.validate()?;
        self.frontier.validate()?;
        if self.llm.model.trim().is_empty() {
            return Err(CliError::Config("llm.model must not be empty".into()));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "llm.request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            settings: Settings::default(),
            llm: LlmSettings::default(),
            pipeline: PipelineConfig::default(),
            oracle: OracleConfig::default(),
            validation: ValidationConfig::default(),
            frontier: FrontierConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".gleaner"))
        .unwrap_or_else(|| PathBuf::from(".gleaner"))
        .join("gleaner.db")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_provider() -> ProviderKind {
    ProviderKind::Ollama
}

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    120
}
