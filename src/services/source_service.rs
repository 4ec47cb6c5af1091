use url::Url;

use crate::domain::{Source, SourceType};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::storage::traits::SourceRepository;

pub struct SourceService<R: SourceRepository> {
    repository: R,
}

impl<R: SourceRepository> SourceService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Register a new source to be polled by `ingest`.
    pub fn add(&self, name: &str, url: &str, source_type: SourceType) -> SiteFeedResult<Source> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SiteFeedError::InvalidInput("Source name is empty".to_string()));
        }

        let url = url.trim();
        let parsed = Url::parse(url).map_err(|e| SiteFeedError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(SiteFeedError::InvalidUrl(format!(
                "{}: only http and https URLs are supported",
                url
            )));
        }

        if self.repository.exists(url)? {
            return Err(SiteFeedError::SourceAlreadyExists(url.to_string()));
        }

        let source = Source::new(name.to_string(), url.to_string(), source_type);
        let id = self.repository.add(&source)?;

        Ok(Source {
            id: Some(id),
            ..source
        })
    }

    pub fn remove(&self, id: i64) -> SiteFeedResult<()> {
        self.repository.remove(id)
    }

    pub fn list(&self) -> SiteFeedResult<Vec<Source>> {
        self.repository.get_all()
    }

    pub fn get(&self, id: i64) -> SiteFeedResult<Option<Source>> {
        self.repository.get_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{SqliteSourceRepository, SqliteStorage};
    use crate::storage::traits::MockSourceRepository;

    fn setup() -> SourceService<SqliteSourceRepository> {
        let storage = SqliteStorage::in_memory().unwrap();
        SourceService::new(SqliteSourceRepository::new(storage))
    }

    #[test]
    fn test_list_empty() {
        let service = setup();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_and_get() {
        let service = setup();
        let source = service
            .add(" Rust Blog ", "https://blog.rust-lang.org/feed.xml", SourceType::Rss)
            .unwrap();

        let id = source.id.unwrap();
        let stored = service.get(id).unwrap().unwrap();
        assert_eq!(stored.name, "Rust Blog");
        assert_eq!(stored.source_type, SourceType::Rss);
    }

    #[test]
    fn test_add_duplicate() {
        let service = setup();
        service
            .add("Blog", "https://blog.example.com/", SourceType::Scrape)
            .unwrap();
        let result = service.add("Blog again", "https://blog.example.com/", SourceType::Scrape);
        assert!(matches!(result, Err(SiteFeedError::SourceAlreadyExists(_))));
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let service = setup();
        assert!(matches!(
            service.add("Blog", "not a url", SourceType::Rss),
            Err(SiteFeedError::InvalidUrl(_))
        ));
        assert!(matches!(
            service.add("Blog", "ftp://files.example.com/feed", SourceType::Rss),
            Err(SiteFeedError::InvalidUrl(_))
        ));
        assert!(matches!(
            service.add("  ", "https://example.com/feed", SourceType::Rss),
            Err(SiteFeedError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_remove_delegates_to_repository() {
        let mut repo = MockSourceRepository::new();
        repo.expect_remove()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(()));

        let service = SourceService::new(repo);
        service.remove(7).unwrap();
    }
}
