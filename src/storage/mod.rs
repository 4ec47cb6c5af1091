pub mod traits;
pub mod sqlite;

pub use traits::{ArticleRepository, SourceRepository};
pub use sqlite::{SqliteArticleRepository, SqliteSourceRepository, SqliteStorage};
