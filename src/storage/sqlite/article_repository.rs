use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{ErrorCode, Row};

use crate::domain::{ArticleListing, ArticleRecord};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::ArticleRepository;

pub struct SqliteArticleRepository {
    storage: SqliteStorage,
}

impl SqliteArticleRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<ArticleListing> {
        let published_at: String = row.get(6)?;
        let published_at = DateTime::parse_from_rfc3339(&published_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        let record = ArticleRecord {
            id: Some(row.get(0)?),
            source_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            content: row.get(4)?,
            author: row.get(5)?,
            published_at,
            filtered_out: row.get(7)?,
            created_at: row.get(8)?,
        };

        Ok(ArticleListing {
            record,
            source_name: row.get(9)?,
        })
    }
}

/// Fixed-width UTC form so text ordering matches time ordering.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl ArticleRepository for SqliteArticleRepository {
    fn exists_by_url(&self, url: &str) -> SiteFeedResult<bool> {
        let conn = self.storage.connection()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE url = ?1)",
            [url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn create(&self, article: &ArticleRecord) -> SiteFeedResult<i64> {
        let conn = self.storage.connection()?;

        let inserted = conn.execute(
            "INSERT INTO articles (source_id, title, url, content, author, published_at, filtered_out)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                article.source_id,
                &article.title,
                &article.url,
                &article.content,
                &article.author,
                timestamp(&article.published_at),
                article.filtered_out,
            ),
        );

        match inserted {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(ref e, ref message))
                if e.code == ErrorCode::ConstraintViolation
                    && message.as_deref().is_some_and(|m| m.contains("articles.url")) =>
            {
                Err(SiteFeedError::ArticleAlreadyExists(article.url.clone()))
            }
            Err(e) => Err(SiteFeedError::from(e)),
        }
    }

    fn list(&self, include_filtered: bool) -> SiteFeedResult<Vec<ArticleListing>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, a.source_id, a.title, a.url, a.content, a.author, a.published_at,
                    a.filtered_out, a.created_at, s.name
             FROM articles a
             JOIN sources s ON s.id = a.source_id
             WHERE ?1 OR a.filtered_out = 0
             ORDER BY a.published_at DESC, a.id DESC",
        )?;

        let articles = stmt.query_map([include_filtered], Self::from_row)?;
        articles.collect::<Result<Vec<_>, _>>().map_err(SiteFeedError::from)
    }
}
