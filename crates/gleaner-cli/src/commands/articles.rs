//! Article inspection command implementation.

use crate::cli::{ArticlesAction, ArticlesArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;
use gleaner_domain::traits::ArticleRepository;
use gleaner_domain::RecordId;

/// Execute an article inspection action.
pub fn execute_articles(
    args: ArticlesArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ArticlesAction::List { limit } => {
            let articles = services.with_store(|store| Ok(store.list_articles(limit)?))?;
            println!("{}", formatter.format_articles(&articles)?);
        }
        ArticlesAction::Show { id } => {
            let record_id = RecordId::from_string(&id).map_err(CliError::InvalidInput)?;
            match services.with_store(|store| Ok(store.get_article(record_id)?))? {
                Some(article) => println!("{}", formatter.format_article(&article)?),
                None => {
                    return Err(CliError::InvalidInput(format!("Article {} not found", id)));
                }
            }
        }
    }
    Ok(())
}
