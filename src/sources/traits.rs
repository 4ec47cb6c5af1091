use crate::domain::{ScrapedArticle, Source, SourceType};
use crate::errors::SiteFeedResult;

/// Turns the fetched body of a configured source into articles.
pub trait ArticleReader: Send + Sync {
    /// Identifies the source type this reader handles
    fn source_type(&self) -> SourceType;

    /// Read articles out of a fetched body
    fn read(&self, source: &Source, body: &str) -> SiteFeedResult<Vec<ScrapedArticle>>;
}
