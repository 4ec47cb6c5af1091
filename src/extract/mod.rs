pub mod dom;
pub mod heuristic;
pub mod structured;

use tracing::{info, warn};

use crate::domain::ScrapedArticle;
use crate::sites::SiteProfile;

pub use heuristic::HeuristicExtractor;
pub use structured::StructuredExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Profile rules first, heuristic when they find nothing.
    #[default]
    Auto,
    HeuristicOnly,
}

/// Extract up to `limit` articles from `raw`.
///
/// Never fails: extraction errors are logged and count as an empty result.
pub fn extract_with_fallback(
    profile: Option<&SiteProfile>,
    raw: &str,
    base_url: &str,
    limit: usize,
    mode: ExtractionMode,
) -> Vec<ScrapedArticle> {
    if mode == ExtractionMode::Auto {
        if let Some(profile) = profile {
            match StructuredExtractor::new(profile).extract(raw, limit) {
                Ok(articles) if !articles.is_empty() => {
                    info!(site = %profile.id, count = articles.len(), "Extracted with site rules");
                    return articles;
                }
                Ok(_) => {
                    info!(site = %profile.id, "Site rules matched nothing, trying heuristic extraction");
                }
                Err(e) => {
                    warn!(site = %profile.id, error = %e, "Structured extraction failed");
                }
            }
        }
    }

    match HeuristicExtractor::new(base_url).extract(raw, limit) {
        Ok(articles) => {
            info!(base_url, count = articles.len(), "Extracted heuristically");
            articles
        }
        Err(e) => {
            warn!(base_url, error = %e, "Heuristic extraction failed");
            Vec::new()
        }
    }
}
