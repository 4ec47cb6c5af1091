/// Decides whether an article matches the configured interests.
#[cfg_attr(test, mockall::automock)]
pub trait KeywordFilter: Send + Sync {
    fn passes(&self, title: &str, content: &str, keyword_csv: &str) -> bool;
}

/// Case-insensitive substring match against a comma-separated keyword list.
///
/// A list with no usable keywords lets everything through.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvKeywordFilter;

impl CsvKeywordFilter {
    pub fn new() -> Self {
        Self
    }
}

pub fn parse_keywords(keyword_csv: &str) -> Vec<String> {
    keyword_csv
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

impl KeywordFilter for CsvKeywordFilter {
    fn passes(&self, title: &str, content: &str, keyword_csv: &str) -> bool {
        let keywords = parse_keywords(keyword_csv);
        if keywords.is_empty() {
            return true;
        }

        let haystack = format!("{} {}", title, content).to_lowercase();
        keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}
