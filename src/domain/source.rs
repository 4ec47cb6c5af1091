use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Rss,
    Json,
    Scrape,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Rss => "rss",
            SourceType::Json => "json",
            SourceType::Scrape => "scrape",
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rss" | "atom" | "feed" => Ok(SourceType::Rss),
            "json" | "api" => Ok(SourceType::Json),
            "scrape" | "html" | "web" => Ok(SourceType::Scrape),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
    pub source_type: SourceType,
    pub created_at: Option<String>,
}

impl Source {
    pub fn new(name: String, url: String, source_type: SourceType) -> Self {
        Self {
            id: None,
            name,
            url,
            source_type,
            created_at: None,
        }
    }
}
