use thiserror::Error;

/// Coarse classification used for logging and for deciding whether a failure
/// is fatal to a request or only to one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Retrieval,
    Extraction,
    Storage,
    Input,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Retrieval => "retrieval",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Storage => "storage",
            ErrorKind::Input => "input",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum SiteFeedError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported site: {0}")]
    UnknownSite(String),

    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    // Network errors
    #[error("Failed to retrieve {url}: {reason}")]
    Retrieval { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    // Feed output errors
    #[error("Invalid channel metadata: {0}")]
    InvalidChannel(String),

    #[error("Feed serialization failed: {0}")]
    FeedWrite(String),

    // Source errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Source already exists: {0}")]
    SourceAlreadyExists(String),

    #[error("Article already exists: {0}")]
    ArticleAlreadyExists(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SiteFeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiteFeedError::Config(_)
            | SiteFeedError::UnknownSite(_)
            | SiteFeedError::InvalidSelector { .. }
            | SiteFeedError::InvalidChannel(_) => ErrorKind::Configuration,
            SiteFeedError::Retrieval { .. } | SiteFeedError::Http(_) => ErrorKind::Retrieval,
            SiteFeedError::Extraction(_)
            | SiteFeedError::FeedParse(_)
            | SiteFeedError::Json(_)
            | SiteFeedError::FeedWrite(_) => ErrorKind::Extraction,
            SiteFeedError::SourceNotFound(_)
            | SiteFeedError::SourceAlreadyExists(_)
            | SiteFeedError::ArticleAlreadyExists(_)
            | SiteFeedError::Database(_)
            | SiteFeedError::Io(_) => ErrorKind::Storage,
            SiteFeedError::InvalidUrl(_) | SiteFeedError::InvalidInput(_) => ErrorKind::Input,
        }
    }
}

pub type SiteFeedResult<T> = Result<T, SiteFeedError>;
