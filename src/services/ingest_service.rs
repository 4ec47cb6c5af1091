use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::{ArticleRecord, Source};
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::fetch::Fetcher;
use crate::filter::KeywordFilter;
use crate::sources::ReaderRegistry;
use crate::storage::traits::{ArticleRepository, SourceRepository};

/// A source that could not be ingested during a run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub url: String,
    pub message: String,
}

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub sources_seen: usize,
    pub failed: Vec<SourceFailure>,
    pub created: usize,
    pub skipped_existing: usize,
    pub filtered: usize,
}

#[derive(Debug, Default)]
struct SourceStats {
    created: usize,
    skipped_existing: usize,
    filtered: usize,
}

pub struct IngestService<S, A, F, K>
where
    S: SourceRepository,
    A: ArticleRepository,
    F: Fetcher,
    K: KeywordFilter,
{
    sources: S,
    articles: A,
    fetcher: F,
    filter: K,
    readers: ReaderRegistry,
    keywords: String,
}

impl<S, A, F, K> IngestService<S, A, F, K>
where
    S: SourceRepository,
    A: ArticleRepository,
    F: Fetcher,
    K: KeywordFilter,
{
    pub fn new(
        sources: S,
        articles: A,
        fetcher: F,
        filter: K,
        readers: ReaderRegistry,
        keywords: String,
    ) -> Self {
        Self {
            sources,
            articles,
            fetcher,
            filter,
            readers,
            keywords,
        }
    }

    /// Poll every configured source once, storing articles not seen before.
    ///
    /// A failing source is recorded in the report and the run moves on.
    pub fn run(&self) -> SiteFeedResult<IngestReport> {
        let sources = self.sources.get_all()?;
        let mut report = IngestReport {
            sources_seen: sources.len(),
            ..Default::default()
        };

        for source in &sources {
            let mut stats = SourceStats::default();
            let outcome = self.ingest_source(source, &mut stats);

            // Rows stored before a mid-source failure still count
            report.created += stats.created;
            report.skipped_existing += stats.skipped_existing;
            report.filtered += stats.filtered;

            if let Err(e) = outcome {
                warn!(source = %source.name, url = %source.url, kind = %e.kind(), error = %e, "Source failed");
                report.failed.push(SourceFailure {
                    source: source.name.clone(),
                    url: source.url.clone(),
                    message: e.to_string(),
                });
            }
        }

        info!(
            sources = report.sources_seen,
            failed = report.failed.len(),
            created = report.created,
            skipped = report.skipped_existing,
            filtered = report.filtered,
            "Ingestion finished"
        );
        Ok(report)
    }

    #[instrument(skip(self, source, stats), fields(source = %source.name, url = %source.url, kind = %source.source_type))]
    fn ingest_source(&self, source: &Source, stats: &mut SourceStats) -> SiteFeedResult<()> {
        let source_id = source
            .id
            .ok_or_else(|| SiteFeedError::SourceNotFound(format!("{} has no id", source.url)))?;

        let body = self.fetcher.fetch(&source.url)?;
        let articles = self.readers.read(source, &body)?;

        for article in &articles {
            if self.articles.exists_by_url(&article.url)? {
                stats.skipped_existing += 1;
                continue;
            }

            let passed = self
                .filter
                .passes(&article.title, &article.description, &self.keywords);
            let record = ArticleRecord::from_article(source_id, article, !passed);

            match self.articles.create(&record) {
                Ok(_) => {
                    stats.created += 1;
                    if !passed {
                        stats.filtered += 1;
                    }
                }
                // Stored by a concurrent run since the existence check
                Err(SiteFeedError::ArticleAlreadyExists(_)) => stats.skipped_existing += 1,
                Err(e) => return Err(e),
            }
        }

        info!(
            read = articles.len(),
            created = stats.created,
            filtered = stats.filtered,
            "Source ingested"
        );
        Ok(())
    }
}
