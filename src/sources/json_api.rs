use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::domain::{ScrapedArticle, Source, SourceType};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::sites::profile::{parse_date, UrlStrategy};
use crate::sources::origin;
use crate::sources::traits::ArticleReader;

const UNTITLED: &str = "Untitled";

/// Reads article lists from JSON APIs.
///
/// Accepts `{"items": [...]}`, `{"articles": [...]}` or a bare array. Each
/// object may use `title`/`headline`, `content`/`description`, `url`/`link`
/// and `publishedAt`.
pub struct JsonApiReader;

impl JsonApiReader {
    pub fn new() -> Self {
        Self
    }

    fn items(document: &Value) -> Option<&Vec<Value>> {
        document
            .get("items")
            .and_then(Value::as_array)
            .or_else(|| document.get("articles").and_then(Value::as_array))
            .or_else(|| document.as_array())
    }

    /// First non-empty string among `keys`.
    fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| item.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

impl Default for JsonApiReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleReader for JsonApiReader {
    fn source_type(&self) -> SourceType {
        SourceType::Json
    }

    fn read(&self, source: &Source, body: &str) -> SiteFeedResult<Vec<ScrapedArticle>> {
        let document: Value = serde_json::from_str(body)?;
        let items = Self::items(&document).ok_or_else(|| {
            SiteFeedError::FeedParse(format!("No article list found in response from {}", source.url))
        })?;
        let base_url = origin(&source.url)?;
        let now = Utc::now();

        let articles = items
            .iter()
            .filter_map(|item| {
                let href = Self::string_field(item, &["url", "link"]);
                let url = href
                    .as_deref()
                    .and_then(|href| UrlStrategy::AbsolutizeRelative.apply(href, &base_url));
                let Some(url) = url else {
                    debug!(source = %source.name, href = ?href, "Skipping item without usable url");
                    return None;
                };

                let title = Self::string_field(item, &["title", "headline"])
                    .unwrap_or_else(|| UNTITLED.to_string());
                let content = Self::string_field(item, &["content", "description"]);
                let published_at = Self::string_field(item, &["publishedAt"])
                    .and_then(|raw| parse_date(&raw))
                    .unwrap_or(now);
                let author = Self::string_field(item, &["author"]);

                Some(
                    ScrapedArticle::new(title, url, published_at)
                        .with_description(content)
                        .with_author(author),
                )
            })
            .collect();

        Ok(articles)
    }
}
