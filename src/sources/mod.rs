use url::Url;

use crate::errors::{SiteFeedError, SiteFeedResult};

pub mod json_api;
pub mod registry;
pub mod rss_atom;
pub mod scrape;
pub mod traits;

pub use registry::ReaderRegistry;
pub use traits::ArticleReader;

/// `scheme://host[:port]` of `url`.
pub(crate) fn origin(url: &str) -> SiteFeedResult<String> {
    let parsed = Url::parse(url).map_err(|e| SiteFeedError::InvalidUrl(e.to_string()))?;
    if !parsed.has_host() {
        return Err(SiteFeedError::InvalidUrl(format!("Missing host: {}", url)));
    }
    Ok(parsed.origin().ascii_serialization())
}
