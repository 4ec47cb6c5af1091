//! Static tables driving the heuristic extractor.

use std::ops::Range;

use once_cell::sync::Lazy;
use scraper::Selector;

/// A candidate container: elements matching `css` that also contain at least
/// one descendant matching `requires`.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector {
    pub css: &'static str,
    pub requires: Option<&'static str>,
}

const fn plain(css: &'static str) -> CandidateSelector {
    CandidateSelector {
        css,
        requires: None,
    }
}

const fn containing(css: &'static str, requires: &'static str) -> CandidateSelector {
    CandidateSelector {
        css,
        requires: Some(requires),
    }
}

/// Broad to specific: semantic containers, heading-bearing blocks, then
/// generic link-bearing elements.
pub const CANDIDATE_SELECTORS: &[CandidateSelector] = &[
    plain("article"),
    plain(".post"),
    plain(".article"),
    plain(".news-item"),
    plain(".content-item"),
    plain(r#"[class*="post"]"#),
    plain(r#"[class*="article"]"#),
    plain(r#"[class*="news"]"#),
    plain(".card"),
    plain(".featured-post"),
    plain(".post-card"),
    plain(".article-card"),
    plain(r#"[class*="card"]"#),
    plain(r#"[class*="item"]"#),
    plain(r#"[class*="content"]"#),
    plain(".list-item"),
    plain(".feed-item"),
    containing("div", "h1"),
    containing("div", "h2"),
    containing("div", "h3"),
    containing("div", "h4"),
    containing("li", "h1"),
    containing("li", "h2"),
    containing("li", "h3"),
    containing("li", "h4"),
    plain(".grid > div"),
    plain(r#"[class*="grid"] > div"#),
    plain("[data-testid]"),
    plain(r#"a[href*="/"]"#),
];

/// Looked up in order inside a container; only the first match of each lookup is
/// considered. The container's own first anchor is tried after these.
pub const TITLE_LOOKUPS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    ".title",
    ".headline",
    r#"[class*="title"]"#,
    r#"[class*="headline"]"#,
    r#"[class*="heading"]"#,
];

pub const DESCRIPTION_LOOKUPS: &[&str] = &[
    "p",
    ".excerpt",
    ".description",
    ".summary",
    r#"[class*="excerpt"]"#,
    r#"[class*="description"]"#,
    r#"[class*="summary"]"#,
];

/// Navigation and boilerplate phrases. A title containing any of these
/// (case-insensitive) is not an article.
pub const DENYLIST: &[&str] = &[
    "terms of use",
    "privacy policy",
    "about us",
    "contact",
    "menu",
    "navigation",
    "sign in",
    "sign up",
    "login",
    "register",
    "subscribe",
    "newsletter",
    "terms",
    "privacy",
    "cookie",
    "home",
    "back to",
    "read more",
    "continue reading",
    "share",
    "tweet",
    "facebook",
    "linkedin",
    "instagram",
    "twitter",
    "portfolio",
    "team",
    "careers",
    "jobs",
    "legal",
    "disclaimer",
];

/// Title length (chars) accepted from a heading, title-like element or anchor.
pub const HEADING_TITLE_LEN: Range<usize> = 10..201;

/// Title length (chars) accepted from a line of the container's text.
pub const LINE_TITLE_LEN: Range<usize> = 10..300;

pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const MAX_DESCRIPTION_CHARS: usize = 300;

pub struct CompiledCandidate {
    pub css: &'static str,
    pub selector: Selector,
    pub requires: Option<Selector>,
}

fn compile(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector `{}`: {:?}", css, e))
}

pub static CANDIDATES: Lazy<Vec<CompiledCandidate>> = Lazy::new(|| {
    CANDIDATE_SELECTORS
        .iter()
        .map(|candidate| CompiledCandidate {
            css: candidate.css,
            selector: compile(candidate.css),
            requires: candidate.requires.map(compile),
        })
        .collect()
});

pub static TITLE_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| TITLE_LOOKUPS.iter().map(|css| compile(css)).collect());

pub static DESCRIPTION_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| DESCRIPTION_LOOKUPS.iter().map(|css| compile(css)).collect());

pub static ANCHOR: Lazy<Selector> = Lazy::new(|| compile("a"));
