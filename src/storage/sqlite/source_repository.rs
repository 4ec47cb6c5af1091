use rusqlite::types::Type;
use rusqlite::Row;

use crate::domain::{Source, SourceType};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::SourceRepository;

const SELECT_SOURCE: &str = "SELECT id, name, url, source_type, created_at FROM sources";

pub struct SqliteSourceRepository {
    storage: SqliteStorage,
}

impl SqliteSourceRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Source> {
        let source_type: String = row.get(3)?;
        let source_type = source_type
            .parse::<SourceType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;

        Ok(Source {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            url: row.get(2)?,
            source_type,
            created_at: row.get(4)?,
        })
    }
}

impl SourceRepository for SqliteSourceRepository {
    fn add(&self, source: &Source) -> SiteFeedResult<i64> {
        let conn = self.storage.connection()?;

        // Checked on the same connection to avoid re-locking
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sources WHERE url = ?1)",
            [&source.url],
            |row| row.get(0),
        )?;
        if exists {
            return Err(SiteFeedError::SourceAlreadyExists(source.url.clone()));
        }

        conn.execute(
            "INSERT INTO sources (name, url, source_type) VALUES (?1, ?2, ?3)",
            (&source.name, &source.url, source.source_type.as_str()),
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn remove(&self, id: i64) -> SiteFeedResult<()> {
        let conn = self.storage.connection()?;
        let removed = conn.execute("DELETE FROM sources WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(SiteFeedError::SourceNotFound(id.to_string()));
        }
        Ok(())
    }

    fn get_all(&self) -> SiteFeedResult<Vec<Source>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_SOURCE))?;

        let sources = stmt.query_map([], Self::from_row)?;
        sources.collect::<Result<Vec<_>, _>>().map_err(SiteFeedError::from)
    }

    fn get_by_id(&self, id: i64) -> SiteFeedResult<Option<Source>> {
        let conn = self.storage.connection()?;
        let source = conn.query_row(&format!("{} WHERE id = ?1", SELECT_SOURCE), [id], Self::from_row);

        match source {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SiteFeedError::from(e)),
        }
    }

    fn exists(&self, url: &str) -> SiteFeedResult<bool> {
        let conn = self.storage.connection()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sources WHERE url = ?1)",
            [url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}
