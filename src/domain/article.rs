use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article pulled out of a fetched page or feed.
///
/// `description` is never empty: it starts out as a copy of the title and is
/// only replaced when the extractor finds real summary text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub author: Option<String>,
    pub category: Option<String>,
}

impl ScrapedArticle {
    pub fn new(title: String, url: String, published_at: DateTime<Utc>) -> Self {
        Self {
            description: title.clone(),
            title,
            url,
            published_at,
            author: None,
            category: None,
        }
    }

    /// Key used for per-call title deduplication.
    pub fn title_key(&self) -> String {
        normalize_title(&self.title)
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            self.description = description;
        }
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.trim().is_empty());
        self
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
