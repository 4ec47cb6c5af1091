use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::SiteFeedResult;
use crate::extract::dom::CssRule;

/// How a scraped `href` becomes an article URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlStrategy {
    /// Keep the href as written; relative links are rejected.
    Identity,
    /// Absolute links pass unchanged, `/path` is prefixed with the base URL
    /// and any other relative link is joined to the base URL with a `/`.
    #[default]
    AbsolutizeRelative,
}

impl UrlStrategy {
    /// Resolve `href` against `base_url`. Returns `None` when the result is
    /// not an absolute http(s) URL.
    pub fn apply(&self, href: &str, base_url: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let candidate = match self {
            UrlStrategy::Identity => href.to_string(),
            UrlStrategy::AbsolutizeRelative => absolutize(href, base_url)?,
        };

        match Url::parse(&candidate) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
                Some(candidate)
            }
            _ => None,
        }
    }
}

fn absolutize(href: &str, base_url: &str) -> Option<String> {
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with('#')
        || href.chars().any(char::is_whitespace)
        || ["javascript:", "mailto:", "tel:", "data:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let base = base_url.trim().trim_end_matches('/');
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = Url::parse(base).map(|u| u.scheme().to_string()).ok()?;
        return Some(format!("{}://{}", scheme, rest));
    }
    if href.starts_with('/') {
        return Some(format!("{}{}", base, href));
    }
    Some(format!("{}/{}", base, href))
}

/// How a scraped date string becomes a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStrategy {
    /// Try the common machine and human formats, falling back to `now`.
    StandardParse,
    /// Ignore the page's date and stamp articles with the extraction time.
    #[default]
    FallbackToNow,
}

impl DateStrategy {
    pub fn resolve(&self, raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
        match (self, raw) {
            (DateStrategy::StandardParse, Some(raw)) => parse_date(raw).unwrap_or(now),
            _ => now,
        }
    }
}

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)(st|nd|rd|th)\b").expect("valid ordinal regex"));

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%b. %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

/// Parse the date formats seen on article listing pages.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let cleaned = ORDINAL_SUFFIX.replace_all(raw, "$1");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

/// The selectors a profile uses to find articles on its listing page.
#[derive(Debug, Clone)]
pub struct SelectorRules {
    pub container: CssRule,
    pub title: CssRule,
    pub description: CssRule,
    pub url: CssRule,
    pub date: Option<CssRule>,
    pub author: Option<CssRule>,
}

impl SelectorRules {
    pub fn new(container: &str, title: &str, description: &str, url: &str) -> SiteFeedResult<Self> {
        Ok(Self {
            container: CssRule::parse(container)?,
            title: CssRule::parse(title)?,
            description: CssRule::parse(description)?,
            url: CssRule::parse(url)?,
            date: None,
            author: None,
        })
    }

    pub fn with_date(mut self, css: &str) -> SiteFeedResult<Self> {
        self.date = Some(CssRule::parse(css)?);
        Ok(self)
    }

    pub fn with_author(mut self, css: &str) -> SiteFeedResult<Self> {
        self.author = Some(CssRule::parse(css)?);
        Ok(self)
    }
}

/// Extraction rules for one site.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub description: String,
    pub scrape_url: Option<String>,
    pub rules: SelectorRules,
    pub url_strategy: Option<UrlStrategy>,
    pub date_strategy: Option<DateStrategy>,
}

impl SiteProfile {
    pub fn new(
        id: String,
        name: String,
        base_url: String,
        description: String,
        rules: SelectorRules,
    ) -> Self {
        Self {
            id,
            name,
            base_url,
            description,
            scrape_url: None,
            rules,
            url_strategy: None,
            date_strategy: None,
        }
    }

    pub fn with_scrape_url(mut self, scrape_url: Option<String>) -> Self {
        self.scrape_url = scrape_url;
        self
    }

    pub fn with_url_strategy(mut self, strategy: UrlStrategy) -> Self {
        self.url_strategy = Some(strategy);
        self
    }

    pub fn with_date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.date_strategy = Some(strategy);
        self
    }

    /// The page to fetch when building a feed for this site.
    pub fn scrape_url(&self) -> &str {
        self.scrape_url.as_deref().unwrap_or(&self.base_url)
    }

    pub fn url_strategy(&self) -> UrlStrategy {
        self.url_strategy.unwrap_or_default()
    }

    pub fn date_strategy(&self) -> DateStrategy {
        self.date_strategy.unwrap_or_default()
    }

    pub fn normalize_url(&self, href: &str) -> Option<String> {
        self.url_strategy().apply(href, &self.base_url)
    }
}
