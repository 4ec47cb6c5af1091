//! Generic article extraction for pages without a site profile, or whose
//! profile no longer matches the markup.
//!
//! The extractor walks a fixed table of candidate containers (see
//! [`tables`]) and, for each container, guesses a title, a link and a short
//! description. Candidates pass through [`filter::check_candidate`] before
//! they are accepted. A single seen-titles set spans the whole call, so
//! overlapping candidate selectors never produce the same article twice.

pub mod filter;
pub mod tables;

use std::collections::HashSet;
use std::ops::Range;

use chrono::{DateTime, Utc};
use scraper::ElementRef;
use tracing::{debug, trace};

use crate::domain::ScrapedArticle;
use crate::errors::SiteFeedResult;
use crate::extract::dom::{
    attr, char_len, clean_text, collapse_whitespace, is_anchor, select_within,
    truncate_with_ellipsis, visible_text, Page,
};
use crate::sites::UrlStrategy;

use self::filter::check_candidate;
use self::tables::{
    ANCHOR, CANDIDATES, DESCRIPTION_SELECTORS, HEADING_TITLE_LEN, LINE_TITLE_LEN,
    MAX_DESCRIPTION_CHARS, MIN_DESCRIPTION_CHARS, TITLE_SELECTORS,
};

pub struct HeuristicExtractor {
    base_url: String,
}

/// A title guess together with the bound it was accepted under and the
/// anchor it came from, if any.
struct TitleGuess<'a> {
    text: String,
    bounds: Range<usize>,
    anchor: Option<ElementRef<'a>>,
}

impl HeuristicExtractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn extract(&self, raw: &str, limit: usize) -> SiteFeedResult<Vec<ScrapedArticle>> {
        self.extract_at(raw, limit, Utc::now())
    }

    pub fn extract_at(
        &self,
        raw: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> SiteFeedResult<Vec<ScrapedArticle>> {
        let page = Page::parse(raw)?;
        let mut seen = HashSet::new();
        let mut articles = Vec::new();

        if limit == 0 {
            return Ok(articles);
        }

        'candidates: for candidate in CANDIDATES.iter() {
            for container in page.select(&candidate.selector) {
                if let Some(required) = &candidate.requires {
                    if select_within(container, required).next().is_none() {
                        continue;
                    }
                }

                let Some(article) = self.article_from(container, &seen, now) else {
                    continue;
                };

                seen.insert(article.title_key());
                trace!(selector = candidate.css, title = %article.title, "Accepted candidate");
                articles.push(article);

                if articles.len() >= limit {
                    break 'candidates;
                }
            }
        }

        debug!(
            base_url = %self.base_url,
            count = articles.len(),
            "Heuristic extraction finished"
        );
        Ok(articles)
    }

    fn article_from(
        &self,
        container: ElementRef<'_>,
        seen: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> Option<ScrapedArticle> {
        let guess = guess_title(container)?;

        let href = guess
            .anchor
            .and_then(|anchor| attr(anchor, "href"))
            .or_else(|| first_anchor(container).and_then(|anchor| attr(anchor, "href")));
        let url = href.and_then(|href| UrlStrategy::AbsolutizeRelative.apply(&href, &self.base_url));

        if let Err(rejection) = check_candidate(&guess.text, &guess.bounds, seen, url.as_deref()) {
            trace!(title = %guess.text, ?rejection, "Rejected candidate");
            return None;
        }

        let description = guess_description(container)
            .map(|text| truncate_with_ellipsis(&text, MAX_DESCRIPTION_CHARS));

        Some(ScrapedArticle::new(guess.text, url?, now).with_description(description))
    }
}

fn guess_title(container: ElementRef<'_>) -> Option<TitleGuess<'_>> {
    for selector in TITLE_SELECTORS.iter() {
        let Some(element) = select_within(container, selector).next() else {
            continue;
        };
        let text = clean_text(element);
        if HEADING_TITLE_LEN.contains(&char_len(&text)) {
            let anchor = if is_anchor(element) {
                Some(element)
            } else {
                select_within(element, &ANCHOR).next()
            };
            return Some(TitleGuess {
                text,
                bounds: HEADING_TITLE_LEN,
                anchor,
            });
        }
    }

    if let Some(anchor) = first_anchor(container) {
        let text = clean_text(anchor);
        if HEADING_TITLE_LEN.contains(&char_len(&text)) {
            return Some(TitleGuess {
                text,
                bounds: HEADING_TITLE_LEN,
                anchor: Some(anchor),
            });
        }
    }

    visible_text(container)
        .lines()
        .map(collapse_whitespace)
        .find(|line| LINE_TITLE_LEN.contains(&char_len(line)))
        .map(|text| TitleGuess {
            text,
            bounds: LINE_TITLE_LEN,
            anchor: None,
        })
}

/// The container itself when it is a link, else its first descendant link.
fn first_anchor(container: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if is_anchor(container) {
        Some(container)
    } else {
        select_within(container, &ANCHOR).next()
    }
}

fn guess_description(container: ElementRef<'_>) -> Option<String> {
    DESCRIPTION_SELECTORS.iter().find_map(|selector| {
        select_within(container, selector)
            .next()
            .map(clean_text)
            .filter(|text| char_len(text) > MIN_DESCRIPTION_CHARS)
    })
}
