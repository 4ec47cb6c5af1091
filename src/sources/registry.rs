use std::sync::Arc;

use crate::domain::{ScrapedArticle, Source, SourceType};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::sites::SiteRegistry;
use crate::sources::traits::ArticleReader;
use crate::sources::{json_api::JsonApiReader, rss_atom::RssAtomReader, scrape::ScrapeReader};

pub struct ReaderRegistry {
    readers: Vec<Box<dyn ArticleReader>>,
}

impl ReaderRegistry {
    /// Registry with a reader for every source type.
    pub fn new(sites: Arc<SiteRegistry>, scrape_limit: usize) -> Self {
        let mut registry = Self::empty();

        registry.register(Box::new(RssAtomReader::new()));
        registry.register(Box::new(JsonApiReader::new()));
        registry.register(Box::new(ScrapeReader::new(sites, scrape_limit)));

        registry
    }

    pub fn empty() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    pub fn register(&mut self, reader: Box<dyn ArticleReader>) {
        self.readers.push(reader);
    }

    pub fn find_reader(&self, source_type: SourceType) -> Option<&dyn ArticleReader> {
        self.readers
            .iter()
            .find(|r| r.source_type() == source_type)
            .map(|r| r.as_ref())
    }

    /// Read articles from a fetched body with the reader for the source's type
    pub fn read(&self, source: &Source, body: &str) -> SiteFeedResult<Vec<ScrapedArticle>> {
        let reader = self.find_reader(source.source_type).ok_or_else(|| {
            SiteFeedError::Config(format!("No reader for source type {}", source.source_type))
        })?;

        reader.read(source, body)
    }
}
