//! Command implementations.

pub mod articles;
pub mod config;
pub mod ingest;
pub mod probe;
pub mod run;
pub mod source;

pub use self::articles::execute_articles;
pub use self::config::execute_config;
pub use self::ingest::execute_ingest;
pub use self::probe::execute_probe;
pub use self::run::{execute_run, execute_watch};
pub use self::source::execute_source;
