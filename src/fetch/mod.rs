use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;

use crate::config::Config;
use crate::errors::{SiteFeedError, SiteFeedResult};

/// Retrieves raw documents over the network.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> SiteFeedResult<String>;
}

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Blocking HTTP fetcher that presents itself as a desktop browser.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> SiteFeedResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| SiteFeedError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> SiteFeedResult<String> {
        debug!(url, "Fetching");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SiteFeedError::Retrieval {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteFeedError::Retrieval {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        response.text().map_err(|e| SiteFeedError::Retrieval {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
