//! Thin helpers over `scraper` shared by the structured and heuristic
//! extractors: document parsing, compiled selectors, descendant lookup and
//! visible-text collection.

use scraper::{ElementRef, Html, Selector};

use crate::errors::{SiteFeedError, SiteFeedResult};

/// Elements whose text never reaches the reader.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Elements after which a line break is inserted when collecting text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

pub const ELLIPSIS: &str = "...";

/// A parsed HTML document.
pub struct Page {
    html: Html,
}

impl Page {
    /// Parse a raw document.
    ///
    /// html5ever accepts any byte soup, so "unparseable" here means there is
    /// no markup to work with at all.
    pub fn parse(raw: &str) -> SiteFeedResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SiteFeedError::Extraction("document is empty".to_string()));
        }
        if !trimmed.contains('<') {
            return Err(SiteFeedError::Extraction(
                "document contains no markup".to_string(),
            ));
        }

        Ok(Self {
            html: Html::parse_document(raw),
        })
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }
}

/// A CSS selector together with the source text it was compiled from.
#[derive(Debug, Clone)]
pub struct CssRule {
    source: String,
    selector: Selector,
}

impl CssRule {
    pub fn parse(css: &str) -> SiteFeedResult<Self> {
        let selector = Selector::parse(css).map_err(|e| SiteFeedError::InvalidSelector {
            selector: css.to_string(),
            reason: format!("{:?}", e),
        })?;

        Ok(Self {
            source: css.to_string(),
            selector,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Descendants of `scope` (excluding `scope` itself) matching `selector`, in
/// document order.
pub fn select_within<'a>(
    scope: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |element| selector.matches(element))
}

/// Text a reader would see, with a newline after each block element.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    push_visible_text(element, &mut text);
    text
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if HIDDEN_TAGS.contains(&name) {
                continue;
            }
            push_visible_text(child_element, out);
            if BLOCK_TAGS.contains(&name) {
                out.push('\n');
            }
        }
    }
}

/// Collapse all whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of `element`, whitespace collapsed.
pub fn clean_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&visible_text(element))
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keep the first `max_chars` characters and append an ellipsis when the text
/// is longer than that.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Trimmed, non-empty attribute value.
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn is_anchor(element: ElementRef<'_>) -> bool {
    element.value().name() == "a"
}
