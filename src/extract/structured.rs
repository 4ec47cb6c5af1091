use std::collections::HashSet;

use chrono::{DateTime, Utc};
use scraper::ElementRef;
use tracing::debug;

use crate::domain::ScrapedArticle;
use crate::errors::SiteFeedResult;
use crate::extract::dom::{attr, clean_text, select_within, truncate_with_ellipsis, CssRule, Page};
use crate::sites::SiteProfile;

pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_TITLE_CHARS: usize = 300;

/// Applies a site profile's selector rules to a fetched listing page.
pub struct StructuredExtractor<'a> {
    profile: &'a SiteProfile,
}

impl<'a> StructuredExtractor<'a> {
    pub fn new(profile: &'a SiteProfile) -> Self {
        Self { profile }
    }

    pub fn extract(&self, raw: &str, limit: usize) -> SiteFeedResult<Vec<ScrapedArticle>> {
        self.extract_at(raw, limit, Utc::now())
    }

    /// Same as [`extract`](Self::extract) with an explicit extraction time.
    pub fn extract_at(
        &self,
        raw: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> SiteFeedResult<Vec<ScrapedArticle>> {
        let page = Page::parse(raw)?;
        let mut articles = Vec::new();
        let mut seen_titles = HashSet::new();

        if limit == 0 {
            return Ok(articles);
        }

        for container in page.select(self.profile.rules.container.selector()) {
            let Some(article) = self.article_from(container, now) else {
                continue;
            };

            if !seen_titles.insert(article.title_key()) {
                debug!(title = %article.title, "Skipping repeated container");
                continue;
            }

            articles.push(article);
            if articles.len() >= limit {
                break;
            }
        }

        debug!(
            site = %self.profile.id,
            count = articles.len(),
            "Structured extraction finished"
        );
        Ok(articles)
    }

    fn article_from(&self, container: ElementRef<'_>, now: DateTime<Utc>) -> Option<ScrapedArticle> {
        let rules = &self.profile.rules;

        let title = title_text(container, &rules.title)?;
        let title = truncate_with_ellipsis(&title, MAX_TITLE_CHARS);

        let href = select_within(container, rules.url.selector())
            .next()
            .and_then(|el| attr(el, "href"))?;
        let url = self.profile.normalize_url(&href)?;

        let description = first_text(container, &rules.description)
            .map(|d| truncate_with_ellipsis(&d, MAX_DESCRIPTION_CHARS));

        let raw_date = rules.date.as_ref().and_then(|rule| {
            select_within(container, rule.selector())
                .next()
                .and_then(|el| attr(el, "datetime").or_else(|| non_empty(clean_text(el))))
        });
        let published_at = self
            .profile
            .date_strategy()
            .resolve(raw_date.as_deref(), now);

        let author = rules
            .author
            .as_ref()
            .and_then(|rule| first_text(container, rule));

        Some(
            ScrapedArticle::new(title, url, published_at)
                .with_description(description)
                .with_author(author),
        )
    }
}

/// First match with visible text, else the first match's `title` attribute.
fn title_text(container: ElementRef<'_>, rule: &CssRule) -> Option<String> {
    let mut first_match = None;
    for element in select_within(container, rule.selector()) {
        if first_match.is_none() {
            first_match = Some(element);
        }
        if let Some(text) = non_empty(clean_text(element)) {
            return Some(text);
        }
    }
    first_match.and_then(|el| attr(el, "title"))
}

fn first_text(container: ElementRef<'_>, rule: &CssRule) -> Option<String> {
    select_within(container, rule.selector()).find_map(|el| non_empty(clean_text(el)))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SiteFeedError;
    use crate::sites::{DateStrategy, SelectorRules, UrlStrategy};
    use chrono::TimeZone;

    fn profile() -> SiteProfile {
        let rules = SelectorRules::new(".story", "h2", "p", "a")
            .unwrap()
            .with_date("time")
            .unwrap()
            .with_author(".author")
            .unwrap();
        SiteProfile::new(
            "news.example".to_string(),
            "Example News".to_string(),
            "https://news.example".to_string(),
            "Example headlines".to_string(),
            rules,
        )
        .with_date_strategy(DateStrategy::StandardParse)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    const THREE_STORIES: &str = r#"
        <html><body>
          <div class="story">
            <h2>Seed round closes for robotics startup</h2>
            <p>A short summary of the first story.</p>
            <a href="/stories/one">link</a>
            <time datetime="2024-03-05T10:00:00Z">March 5</time>
            <span class="author">Ada Lovelace</span>
          </div>
          <div class="story">
            <h2>Chip makers expand fabs in Arizona</h2>
            <p>Second summary.</p>
            <a href="https://elsewhere.example/two">link</a>
          </div>
          <div class="story">
            <h2>Quarterly earnings beat expectations</h2>
            <a href="stories/three">link</a>
            <time>not a real date</time>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_three_containers_in_document_order() {
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(THREE_STORIES, 10, now())
            .unwrap();

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "Seed round closes for robotics startup");
        assert_eq!(articles[1].title, "Chip makers expand fabs in Arizona");
        assert_eq!(articles[2].title, "Quarterly earnings beat expectations");

        assert_eq!(articles[0].url, "https://news.example/stories/one");
        assert_eq!(articles[1].url, "https://elsewhere.example/two");
        assert_eq!(articles[2].url, "https://news.example/stories/three");
    }

    #[test]
    fn test_fields_extracted() {
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(THREE_STORIES, 10, now())
            .unwrap();

        let first = &articles[0];
        assert_eq!(first.description, "A short summary of the first story.");
        assert_eq!(first.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(
            first.published_at,
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
        );

        // No description element: falls back to the title.
        assert_eq!(articles[2].description, articles[2].title);
        // Unparseable date: extraction time.
        assert_eq!(articles[2].published_at, now());
        // No date element at all.
        assert_eq!(articles[1].published_at, now());
        assert!(articles[1].author.is_none());
    }

    #[test]
    fn test_limit_respected() {
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(THREE_STORIES, 2, now())
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].title, "Chip makers expand fabs in Arizona");
    }

    #[test]
    fn test_zero_limit_yields_nothing() {
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(THREE_STORIES, 0, now())
            .unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_containers_without_title_or_url_skipped() {
        let html = r#"
            <div class="story"><p>No heading here</p><a href="/x">x</a></div>
            <div class="story"><h2>Heading without any link</h2></div>
            <div class="story"><h2>Valid story with link</h2><a href="/ok">ok</a></div>
        "#;
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(html, 10, now())
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Valid story with link");
    }

    #[test]
    fn test_title_attribute_fallback() {
        let html = r#"
            <div class="story"><h2 title="Icon only headline"><img src="x.png"></h2><a href="/icon">x</a></div>
        "#;
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(html, 10, now())
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Icon only headline");
    }

    #[test]
    fn test_long_description_truncated() {
        let long = "word ".repeat(80);
        let html = format!(
            r#"<div class="story"><h2>Long summary story</h2><p>{}</p><a href="/long">x</a></div>"#,
            long
        );
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(&html, 10, now())
            .unwrap();

        let description = &articles[0].description;
        assert!(description.ends_with("..."));
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS + 3);
    }

    #[test]
    fn test_date_attribute_preferred_over_text() {
        let html = r#"
            <div class="story"><h2>Dated story headline</h2><a href="/d">x</a>
            <time datetime="2023-12-24">Christmas Eve</time></div>
        "#;
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(html, 10, now())
            .unwrap();
        assert_eq!(
            articles[0].published_at,
            Utc.with_ymd_and_hms(2023, 12, 24, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_stale_selectors_yield_empty_result() {
        let html = r#"<div class="card"><h3>Totally different markup</h3><a href="/x">x</a></div>"#;
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(html, 10, now())
            .unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_identity_strategy_drops_relative_links() {
        let profile = profile().with_url_strategy(UrlStrategy::Identity);
        let articles = StructuredExtractor::new(&profile)
            .extract_at(THREE_STORIES, 10, now())
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://elsewhere.example/two");
    }

    #[test]
    fn test_overlapping_containers_deduplicated() {
        let rules = SelectorRules::new("article, .card", "h2", "p", "a").unwrap();
        let profile = SiteProfile::new(
            "news.example".to_string(),
            "Example News".to_string(),
            "https://news.example".to_string(),
            String::new(),
            rules,
        );
        let html = r#"<article class="card"><h2>Only one story here</h2><a href="/one">x</a></article>
                      <div class="card"><div class="card"><h2>Nested card story</h2><a href="/n">x</a></div></div>"#;

        let articles = StructuredExtractor::new(&profile)
            .extract_at(html, 10, now())
            .unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Only one story here", "Nested card story"]);
    }

    #[test]
    fn test_every_url_absolute() {
        let profile = profile();
        let articles = StructuredExtractor::new(&profile)
            .extract_at(THREE_STORIES, 10, now())
            .unwrap();
        for article in articles {
            assert!(url::Url::parse(&article.url).is_ok(), "{} not absolute", article.url);
        }
    }

    #[test]
    fn test_unparseable_document_is_error() {
        let profile = profile();
        let result = StructuredExtractor::new(&profile).extract_at("", 10, now());
        assert!(matches!(result, Err(SiteFeedError::Extraction(_))));
    }
}
