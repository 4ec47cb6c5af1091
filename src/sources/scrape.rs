use std::sync::Arc;

use crate::domain::{ScrapedArticle, Source, SourceType};
use crate::errors::SiteFeedResult;
use crate::extract::{extract_with_fallback, ExtractionMode};
use crate::sites::SiteRegistry;
use crate::sources::origin;
use crate::sources::traits::ArticleReader;

/// Reads generic web pages: site rules when the host has a profile, the
/// heuristic extractor otherwise.
pub struct ScrapeReader {
    sites: Arc<SiteRegistry>,
    limit: usize,
}

impl ScrapeReader {
    pub fn new(sites: Arc<SiteRegistry>, limit: usize) -> Self {
        Self { sites, limit }
    }
}

impl ArticleReader for ScrapeReader {
    fn source_type(&self) -> SourceType {
        SourceType::Scrape
    }

    fn read(&self, source: &Source, body: &str) -> SiteFeedResult<Vec<ScrapedArticle>> {
        let profile = self.sites.find_for_url(&source.url);
        let base_url = match profile {
            Some(profile) => profile.base_url.clone(),
            None => origin(&source.url)?,
        };

        Ok(extract_with_fallback(
            profile,
            body,
            &base_url,
            self.limit,
            ExtractionMode::Auto,
        ))
    }
}
