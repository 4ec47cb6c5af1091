use std::collections::HashSet;
use std::ops::Range;

use crate::domain::normalize_title;
use crate::extract::dom::char_len;
use crate::extract::heuristic::tables::DENYLIST;

/// Why a heuristic candidate was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Length(usize),
    Denylisted(&'static str),
    Duplicate,
    TooFewWords,
    MissingUrl,
}

/// Run the acceptance checks in order and report the first that fails.
pub fn check_candidate(
    title: &str,
    bounds: &Range<usize>,
    seen: &HashSet<String>,
    url: Option<&str>,
) -> Result<(), Rejection> {
    let len = char_len(title);
    if !bounds.contains(&len) {
        return Err(Rejection::Length(len));
    }

    let key = normalize_title(title);
    if let Some(term) = DENYLIST.iter().find(|term| key.contains(*term)) {
        return Err(Rejection::Denylisted(*term));
    }

    if seen.contains(&key) {
        return Err(Rejection::Duplicate);
    }

    if title.split_whitespace().count() < 2 {
        return Err(Rejection::TooFewWords);
    }

    match url {
        Some(url) if !url.trim().is_empty() => Ok(()),
        _ => Err(Rejection::MissingUrl),
    }
}
