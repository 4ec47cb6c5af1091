pub mod article;
pub mod record;
pub mod source;

pub use article::{normalize_title, ScrapedArticle};
pub use record::{ArticleListing, ArticleRecord};
pub use source::{Source, SourceType};
