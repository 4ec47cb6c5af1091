use chrono::Utc;
use feed_rs::parser;
use scraper::Html;
use tracing::debug;

use crate::domain::{ScrapedArticle, Source, SourceType};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::extract::dom::{collapse_whitespace, truncate_with_ellipsis};
use crate::sites::profile::UrlStrategy;
use crate::sources::origin;
use crate::sources::traits::ArticleReader;

const UNTITLED: &str = "Untitled";
const MAX_TITLE_CHARS: usize = 300;

/// Reads RSS, Atom and JSON Feed documents.
pub struct RssAtomReader;

impl RssAtomReader {
    pub fn new() -> Self {
        Self
    }

    fn parse_bytes(bytes: &[u8]) -> SiteFeedResult<feed_rs::model::Feed> {
        parser::parse(bytes).map_err(|e| SiteFeedError::FeedParse(e.to_string()))
    }

    /// Convert HTML content to plain text
    fn html_to_text(html: &str) -> String {
        let document = Html::parse_fragment(html);
        let mut text = String::new();

        for node in document.root_element().descendants() {
            if let Some(text_node) = node.value().as_text() {
                text.push_str(text_node);
            }
            // Keep word boundaries across block elements
            if let Some(element) = node.value().as_element() {
                match element.name() {
                    "p" | "br" | "div" | "li" => text.push(' '),
                    _ => {}
                }
            }
        }

        collapse_whitespace(&text)
    }
}

impl Default for RssAtomReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleReader for RssAtomReader {
    fn source_type(&self) -> SourceType {
        SourceType::Rss
    }

    fn read(&self, source: &Source, body: &str) -> SiteFeedResult<Vec<ScrapedArticle>> {
        let parsed = Self::parse_bytes(body.as_bytes())?;
        let now = Utc::now();

        // Relative item links resolve against the channel's site, else the feed's own host
        let base_url = parsed
            .links
            .iter()
            .find_map(|link| origin(&link.href).ok())
            .or_else(|| origin(&source.url).ok())
            .unwrap_or_default();

        let articles: Vec<ScrapedArticle> = parsed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let url = entry
                    .links
                    .iter()
                    .find_map(|link| UrlStrategy::AbsolutizeRelative.apply(&link.href, &base_url));
                let Some(url) = url else {
                    debug!(source = %source.name, id = %entry.id, "Skipping entry without usable link");
                    return None;
                };

                let title = entry
                    .title
                    .map(|t| Self::html_to_text(&t.content))
                    .filter(|t| !t.is_empty())
                    .map(|t| truncate_with_ellipsis(&t, MAX_TITLE_CHARS))
                    .unwrap_or_else(|| UNTITLED.to_string());

                let description = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .map(|html| Self::html_to_text(&html));

                let published_at = entry.published.or(entry.updated).unwrap_or(now);

                let author = entry
                    .authors
                    .into_iter()
                    .map(|p| p.name)
                    .find(|n| !n.trim().is_empty());

                let category = entry
                    .categories
                    .into_iter()
                    .map(|c| c.label.unwrap_or(c.term))
                    .find(|c| !c.trim().is_empty());

                Some(
                    ScrapedArticle::new(title, url, published_at)
                        .with_description(description)
                        .with_author(author)
                        .with_category(category),
                )
            })
            .collect();

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn source() -> Source {
        Source::new(
            "Rust Blog".to_string(),
            "https://blog.rust-lang.org/feed.xml".to_string(),
            SourceType::Rss,
        )
    }

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Rust Blog</title>
    <link>https://blog.rust-lang.org/</link>
    <description>Empowering everyone to build reliable and efficient software.</description>
    <item>
      <title>Announcing Rust 1.75.0</title>
      <link>https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html</link>
      <description><![CDATA[<p>The Rust team is happy to announce a new version of Rust, 1.75.0.</p><p>It includes async fn in traits.</p>]]></description>
      <author>rust-team@rust-lang.org (The Rust Release Team)</author>
      <category>releases</category>
      <pubDate>Thu, 28 Dec 2023 00:00:00 +0000</pubDate>
      <guid>https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html</guid>
    </item>
    <item>
      <title>Rust 2024 Call for Testing</title>
      <link>https://blog.rust-lang.org/2024/01/10/Rust-2024-CFT.html</link>
      <pubDate>Wed, 10 Jan 2024 00:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Entry without a link</title>
    </item>
  </channel>
</rss>"#;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Tech Blog</title>
  <link href="https://example.com/"/>
  <id>https://example.com/feed.atom</id>
  <updated>2024-01-15T12:00:00Z</updated>
  <entry>
    <title>Understanding WebAssembly</title>
    <link href="https://example.com/posts/wasm-intro"/>
    <id>https://example.com/posts/wasm-intro</id>
    <updated>2024-01-15T12:00:00Z</updated>
    <content type="html"><![CDATA[<article><h1>Understanding WebAssembly</h1><p>WebAssembly is a binary instruction format.</p></article>]]></content>
  </entry>
</feed>"#;

    #[test]
    fn test_source_type() {
        assert_eq!(RssAtomReader::new().source_type(), SourceType::Rss);
    }

    #[test]
    fn test_rss_entries_read() {
        let articles = RssAtomReader::new().read(&source(), SAMPLE_RSS).unwrap();

        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title, "Announcing Rust 1.75.0");
        assert_eq!(
            first.url,
            "https://blog.rust-lang.org/2023/12/28/Rust-1.75.0.html"
        );
        assert_eq!(
            first.description,
            "The Rust team is happy to announce a new version of Rust, 1.75.0. It includes async fn in traits."
        );
        assert_eq!(first.category.as_deref(), Some("releases"));
        assert_eq!(
            first.published_at,
            Utc.with_ymd_and_hms(2023, 12, 28, 0, 0, 0).unwrap()
        );

        // No description: falls back to the title.
        assert_eq!(articles[1].description, "Rust 2024 Call for Testing");
    }

    #[test]
    fn test_atom_content_used_when_no_summary() {
        let articles = RssAtomReader::new().read(&source(), SAMPLE_ATOM).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Understanding WebAssembly");
        assert_eq!(
            articles[0].description,
            "Understanding WebAssembly WebAssembly is a binary instruction format."
        );
        assert_eq!(
            articles[0].published_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_relative_item_links_resolved() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example News</title>
    <link>https://news.example.com/front/</link>
    <description>Headlines</description>
    <item>
      <title>Relative link story</title>
      <link>/p/1</link>
    </item>
    <item>
      <title>Junk link story</title>
      <link>not a url</link>
    </item>
  </channel>
</rss>"#;
        let articles = RssAtomReader::new().read(&source(), body).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://news.example.com/p/1");
    }

    #[test]
    fn test_relative_links_fall_back_to_feed_host() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>No channel link</title>
    <description>Headlines</description>
    <item>
      <title>Relative link story</title>
      <link>/2024/01/relative.html</link>
    </item>
  </channel>
</rss>"#;
        let articles = RssAtomReader::new().read(&source(), body).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://blog.rust-lang.org/2024/01/relative.html");
    }

    #[test]
    fn test_invalid_feed_is_parse_error() {
        let result = RssAtomReader::new().read(&source(), "<html><body>not a feed</body></html>");
        assert!(matches!(result, Err(SiteFeedError::FeedParse(_))));
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(
            RssAtomReader::html_to_text("<p>Hello</p><p>world</p>"),
            "Hello world"
        );
    }
}
