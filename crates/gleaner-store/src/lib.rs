//! Gleaner Storage Layer
//!
//! SQLite persistence for the acquisition pipeline:
//!
//! - `article`: validated article records (the `ArticleRepository` trait)
//! - `retrieved_urls`: the append-only dedup set consulted by the frontier
//!   (the `RetrievedUrlStore` trait)
//! - `source_url`: the registry of content roots
//!
//! # Examples
//!
//! ```
//! use gleaner_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let source = store.add_source("https://news.example.com/").unwrap();
//! assert_eq!(store.list_sources().unwrap(), vec![source]);
//! ```

#![warn(missing_docs)]

use chrono::NaiveDateTime;
use gleaner_domain::traits::{ArticleRepository, RetrievedUrlStore};
use gleaner_domain::{ArticleRecord, RecordId, Source, SourceId, StoredArticle, PUBLISHED_AT_FORMAT};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// SQLite's `CURRENT_TIMESTAMP` format
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ARTICLE_COLUMNS: &str =
    "id, title, short_summary, long_summary, body, url, published_at, created_at";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Source not registered
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based store for articles, sources and the retrieved-URL set
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share one store behind a mutex or
/// open one per thread.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Register a source, returning the existing entry if already present
    pub fn add_source(&mut self, root_url: &str) -> Result<Source, StoreError> {
        let root_url = root_url.trim();
        if root_url.is_empty() {
            return Err(StoreError::InvalidData("source url is empty".to_string()));
        }

        self.conn.execute(
            "INSERT OR IGNORE INTO source_url (url) VALUES (?1)",
            params![root_url],
        )?;
        self.source_by_url(root_url)?
            .ok_or_else(|| StoreError::SourceNotFound(root_url.to_string()))
    }

    /// Look up a source by its root URL
    pub fn source_by_url(&self, root_url: &str) -> Result<Option<Source>, StoreError> {
        let source = self
            .conn
            .query_row(
                "SELECT id, url FROM source_url WHERE url = ?1",
                params![root_url],
                |row| Ok(Source::new(SourceId(row.get(0)?), row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(source)
    }

    /// All registered sources in registration order
    pub fn list_sources(&self) -> Result<Vec<Source>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, url FROM source_url ORDER BY id")?;
        let sources = stmt
            .query_map([], |row| {
                Ok(Source::new(SourceId(row.get(0)?), row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sources)
    }

    /// Number of persisted articles
    pub fn article_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM article", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn record_id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_record_id(bytes: &[u8]) -> Result<RecordId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for RecordId, got {}", bytes.len()))
        })?;
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<StoredArticle> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_record_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let published_at = row
            .get::<_, Option<String>>(6)?
            .map(|s| NaiveDateTime::parse_from_str(&s, PUBLISHED_AT_FORMAT))
            .transpose()
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
            })?;

        let created_at: String = row.get(7)?;
        let created_at = NaiveDateTime::parse_from_str(&created_at, SQLITE_TIMESTAMP_FORMAT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(StoredArticle {
            id,
            record: ArticleRecord {
                title: row.get(1)?,
                short_summary: row.get(2)?,
                long_summary: row.get(3)?,
                body: row.get(4)?,
                url: row.get(5)?,
                published_at,
            },
            created_at,
        })
    }
}

impl ArticleRepository for SqliteStore {
    type Error = StoreError;

    fn save(&mut self, record: &ArticleRecord) -> Result<RecordId, Self::Error> {
        let id = RecordId::new();

        self.conn.execute(
            "INSERT INTO article (id, title, short_summary, long_summary, body, url, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::record_id_to_bytes(id),
                &record.title,
                &record.short_summary,
                &record.long_summary,
                &record.body,
                &record.url,
                record
                    .published_at
                    .map(|dt| dt.format(PUBLISHED_AT_FORMAT).to_string()),
            ],
        )?;

        debug!(%id, url = %record.url, "Article row inserted");
        Ok(id)
    }

    fn get_article(&self, id: RecordId) -> Result<Option<StoredArticle>, Self::Error> {
        let article = self
            .conn
            .query_row(
                &format!("SELECT {} FROM article WHERE id = ?1", ARTICLE_COLUMNS),
                params![Self::record_id_to_bytes(id)],
                Self::row_to_article,
            )
            .optional()?;
        Ok(article)
    }

    fn list_articles(&self, limit: usize) -> Result<Vec<StoredArticle>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM article ORDER BY id DESC LIMIT ?1",
            ARTICLE_COLUMNS
        ))?;
        let articles = stmt
            .query_map(params![limit as i64], Self::row_to_article)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(articles)
    }
}

impl RetrievedUrlStore for SqliteStore {
    type Error = StoreError;

    fn retrieved_urls(&self, source: SourceId) -> Result<HashSet<String>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM retrieved_urls WHERE source_id = ?1")?;
        let urls = stmt
            .query_map(params![source.0], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(urls)
    }

    fn record_retrieved(&mut self, source: SourceId, urls: &[String]) -> Result<usize, Self::Error> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO retrieved_urls (source_id, url) VALUES (?1, ?2)",
            )?;
            for url in urls {
                inserted += stmt.execute(params![source.0, url])?;
            }
        }
        tx.commit()?;

        debug!(source = %source, inserted, "Recorded retrieved URLs");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            title: "T".to_string(),
            short_summary: "S".to_string(),
            long_summary: Some("L".to_string()),
            body: "body text".to_string(),
            url: url.to_string(),
            published_at: NaiveDateTime::parse_from_str("2025-02-24T09:30", PUBLISHED_AT_FORMAT).ok(),
        }
    }

    #[test]
    fn test_save_and_get_article() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store.save(&record("https://a.example/1.html")).unwrap();

        let stored = store.get_article(id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.record, record("https://a.example/1.html"));
    }

    #[test]
    fn test_missing_published_at_is_null() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut rec = record("https://a.example/2.html");
        rec.published_at = None;
        rec.long_summary = None;
        let id = store.save(&rec).unwrap();

        let stored = store.get_article(id).unwrap().unwrap();
        assert!(stored.record.published_at.is_none());
        assert!(stored.record.long_summary.is_none());
    }

    #[test]
    fn test_get_unknown_article() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert!(store.get_article(RecordId::new()).unwrap().is_none());
    }

    #[test]
    fn test_add_source_is_idempotent() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = store.add_source("https://a.example/").unwrap();
        let again = store.add_source("https://a.example/").unwrap();
        assert_eq!(a, again);
        assert!(store.add_source("  ").is_err());
    }

    #[test]
    fn test_record_retrieved_ignores_duplicates() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let source = store.add_source("https://a.example/").unwrap();
        let urls = vec!["u1".to_string(), "u2".to_string()];

        assert_eq!(store.record_retrieved(source.id, &urls).unwrap(), 2);
        assert_eq!(store.record_retrieved(source.id, &urls).unwrap(), 0);
        assert_eq!(store.retrieved_urls(source.id).unwrap().len(), 2);
    }

    #[test]
    fn test_retrieved_set_is_per_source() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = store.add_source("https://a.example/").unwrap();
        let b = store.add_source("https://b.example/").unwrap();
        store.record_retrieved(a.id, &["shared".to_string()]).unwrap();

        assert!(store.retrieved_urls(b.id).unwrap().is_empty());
        assert_eq!(store.record_retrieved(b.id, &["shared".to_string()]).unwrap(), 1);
    }

    #[test]
    fn test_unknown_source_rejected_by_foreign_key() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        assert!(store.record_retrieved(SourceId(42), &["u".to_string()]).is_err());
    }
}
