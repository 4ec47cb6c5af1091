use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::DEFAULT_LIMIT;
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::extract::{extract_with_fallback, ExtractionMode};
use crate::fetch::Fetcher;
use crate::sites::SiteRegistry;
use crate::syndication::{synthesize, ChannelMeta, FeedDocument};

/// An on-demand request to turn a supported site into a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub site: String,
    pub limit: usize,
    pub intelligent: bool,
}

impl ConvertRequest {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            limit: DEFAULT_LIMIT,
            intelligent: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_intelligent(mut self, intelligent: bool) -> Self {
        self.intelligent = intelligent;
        self
    }

    fn mode(&self) -> ExtractionMode {
        if self.intelligent {
            ExtractionMode::HeuristicOnly
        } else {
            ExtractionMode::Auto
        }
    }
}

/// Error body reported when a conversion fails.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionFailure {
    pub error: String,
    pub details: String,
    pub site: String,
    pub timestamp: String,
}

impl ConversionFailure {
    pub fn new(site: &str, error: &SiteFeedError) -> Self {
        let summary = match error {
            SiteFeedError::UnknownSite(_) => "Unsupported site",
            SiteFeedError::InvalidInput(_) => "Invalid request",
            _ => "RSS generation failed",
        };

        Self {
            error: summary.to_string(),
            details: error.to_string(),
            site: site.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub struct ConvertService<F: Fetcher> {
    sites: Arc<SiteRegistry>,
    fetcher: F,
}

impl<F: Fetcher> ConvertService<F> {
    pub fn new(sites: Arc<SiteRegistry>, fetcher: F) -> Self {
        Self { sites, fetcher }
    }

    /// Fetch the site's listing page and build a feed from it.
    pub fn build_feed(&self, request: &ConvertRequest) -> SiteFeedResult<FeedDocument> {
        if request.limit == 0 {
            return Err(SiteFeedError::InvalidInput(
                "limit must be at least 1".to_string(),
            ));
        }

        let profile = self.sites.lookup(&request.site)?;
        let scrape_url = profile.scrape_url();
        info!(site = %profile.id, url = scrape_url, limit = request.limit, intelligent = request.intelligent, "Converting site");

        let body = self.fetcher.fetch(scrape_url)?;
        let articles = extract_with_fallback(
            Some(profile),
            &body,
            &profile.base_url,
            request.limit,
            request.mode(),
        );

        let feed = synthesize(ChannelMeta::for_site(profile, Utc::now()), &articles)?;
        info!(site = %profile.id, entries = feed.entries.len(), "Feed generated");
        Ok(feed)
    }

    /// Same as [`build_feed`](Self::build_feed), rendered as RSS XML.
    pub fn convert(&self, request: &ConvertRequest) -> SiteFeedResult<String> {
        self.build_feed(request)?.to_rss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    const A16Z_PAGE: &str = r#"
        <html><body>
          <div class="card">
            <h3>Big ideas in tech for the year ahead</h3>
            <p>Our partners share the ideas they are most excited about.</p>
            <a href="/big-ideas-2025/">Read</a>
          </div>
          <div class="card">
            <h3>The state of consumer AI</h3>
            <a href="/consumer-ai/">Read</a>
          </div>
        </body></html>
    "#;

    fn sites() -> Arc<SiteRegistry> {
        Arc::new(SiteRegistry::builtin().unwrap())
    }

    fn fetcher_returning(body: &'static str) -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url| url == "https://a16z.com/news-content/")
            .returning(move |_| Ok(body.to_string()));
        fetcher
    }

    #[test]
    fn test_request_defaults() {
        let request = ConvertRequest::new("a16z.com");
        assert_eq!(request.limit, 10);
        assert!(!request.intelligent);
        assert_eq!(request.mode(), ExtractionMode::Auto);
        assert_eq!(
            request.with_intelligent(true).mode(),
            ExtractionMode::HeuristicOnly
        );
    }

    #[test]
    fn test_build_feed_from_site_rules() {
        let service = ConvertService::new(sites(), fetcher_returning(A16Z_PAGE));
        let feed = service.build_feed(&ConvertRequest::new("a16z.com")).unwrap();

        assert_eq!(feed.channel.title, "Andreessen Horowitz");
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].link, "https://a16z.com/big-ideas-2025/");
        assert_eq!(
            feed.entries[0].description,
            "Our partners share the ideas they are most excited about."
        );
        assert_eq!(feed.entries[1].title, "The state of consumer AI");
    }

    #[test]
    fn test_limit_respected() {
        let service = ConvertService::new(sites(), fetcher_returning(A16Z_PAGE));
        let feed = service
            .build_feed(&ConvertRequest::new("a16z.com").with_limit(1))
            .unwrap();
        assert_eq!(feed.entries.len(), 1);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let service = ConvertService::new(sites(), MockFetcher::new());
        let result = service.build_feed(&ConvertRequest::new("a16z.com").with_limit(0));
        assert!(matches!(result, Err(SiteFeedError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_site_never_fetches() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(0);

        let service = ConvertService::new(sites(), fetcher);
        let result = service.convert(&ConvertRequest::new("example.org"));
        assert!(matches!(result, Err(SiteFeedError::UnknownSite(_))));
    }

    #[test]
    fn test_retrieval_failure_propagates() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|url| {
            Err(SiteFeedError::Retrieval {
                url: url.to_string(),
                reason: "HTTP 503".to_string(),
            })
        });

        let service = ConvertService::new(sites(), fetcher);
        let err = service.convert(&ConvertRequest::new("a16z.com")).unwrap_err();

        let failure = ConversionFailure::new("a16z.com", &err);
        assert_eq!(failure.error, "RSS generation failed");
        assert!(failure.details.contains("HTTP 503"));
        assert_eq!(failure.site, "a16z.com");
    }

    #[test]
    fn test_empty_page_yields_empty_feed() {
        let service = ConvertService::new(sites(), fetcher_returning("<html><body></body></html>"));
        let xml = service.convert(&ConvertRequest::new("a16z.com")).unwrap();

        assert!(xml.contains("<title>Andreessen Horowitz</title>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_failure_serializes_to_json() {
        let failure = ConversionFailure::new("example.org", &SiteFeedError::UnknownSite("example.org".to_string()));
        let json: serde_json::Value = serde_json::to_value(&failure).unwrap();

        assert_eq!(json["error"], "Unsupported site");
        assert_eq!(json["details"], "Unsupported site: example.org");
        assert_eq!(json["site"], "example.org");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
