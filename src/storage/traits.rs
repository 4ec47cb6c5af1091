use crate::domain::{ArticleListing, ArticleRecord, Source};
use crate::errors::SiteFeedResult;

#[cfg_attr(test, mockall::automock)]
pub trait SourceRepository: Send + Sync {
    fn add(&self, source: &Source) -> SiteFeedResult<i64>;
    fn remove(&self, id: i64) -> SiteFeedResult<()>;
    fn get_all(&self) -> SiteFeedResult<Vec<Source>>;
    fn get_by_id(&self, id: i64) -> SiteFeedResult<Option<Source>>;
    fn exists(&self, url: &str) -> SiteFeedResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ArticleRepository: Send + Sync {
    fn exists_by_url(&self, url: &str) -> SiteFeedResult<bool>;
    /// Fails with `ArticleAlreadyExists` when the url is already stored.
    fn create(&self, article: &ArticleRecord) -> SiteFeedResult<i64>;
    /// Newest first. Filtered-out articles are only included on request.
    fn list(&self, include_filtered: bool) -> SiteFeedResult<Vec<ArticleListing>>;
}
