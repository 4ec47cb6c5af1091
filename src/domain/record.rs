use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ScrapedArticle;

/// An article as kept in the store, tagged with the source it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: Option<i64>,
    pub source_id: i64,
    pub title: String,
    pub url: String,
    pub content: String,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub filtered_out: bool,
    pub created_at: Option<String>,
}

impl ArticleRecord {
    pub fn from_article(source_id: i64, article: &ScrapedArticle, filtered_out: bool) -> Self {
        Self {
            id: None,
            source_id,
            title: article.title.clone(),
            url: article.url.clone(),
            content: article.description.clone(),
            author: article.author.clone(),
            published_at: article.published_at,
            filtered_out,
            created_at: None,
        }
    }
}

/// A persisted article joined with the name of its source, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleListing {
    pub record: ArticleRecord,
    pub source_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_article() {
        let article = ScrapedArticle::new(
            "New AI funding round".to_string(),
            "https://example.com/ai".to_string(),
            Utc::now(),
        )
        .with_description(Some("Seed money for robots".to_string()))
        .with_author(Some("Jane Doe".to_string()));

        let record = ArticleRecord::from_article(7, &article, true);

        assert_eq!(record.source_id, 7);
        assert_eq!(record.title, "New AI funding round");
        assert_eq!(record.content, "Seed money for robots");
        assert_eq!(record.author.as_deref(), Some("Jane Doe"));
        assert!(record.filtered_out);
        assert!(record.id.is_none());
    }
}
