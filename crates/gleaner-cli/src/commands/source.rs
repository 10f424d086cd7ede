//! Source management command implementation.

use crate::cli::{SourceAction, SourceArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;

/// Execute a source management action.
pub fn execute_source(args: SourceArgs, services: &Services, formatter: &Formatter) -> Result<()> {
    match args.action {
        SourceAction::Add { url } => {
            let root = normalize_root(&url)?;
            let source = services.with_store(|store| Ok(store.add_source(&root)?))?;
            println!(
                "{}",
                formatter.success(&format!("Source {} registered: {}", source.id, source.root_url))
            );
        }
        SourceAction::List => {
            let sources = services.sources()?;
            println!("{}", formatter.format_sources(&sources)?);
        }
    }
    Ok(())
}

/// Sources are stored with a trailing slash so sitemap URLs join cleanly.
fn normalize_root(url: &str) -> Result<String> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CliError::InvalidInput(format!(
            "Source '{}' must be an http(s) URL",
            url
        )));
    }
    if url.ends_with('/') {
        Ok(url.to_string())
    } else {
        Ok(format!("{}/", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("https://news.example").unwrap(), "https://news.example/");
        assert_eq!(normalize_root("https://news.example/").unwrap(), "https://news.example/");
        assert!(normalize_root("news.example").is_err());
    }
}
