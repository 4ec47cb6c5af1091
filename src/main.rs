use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitefeed::cli::{Cli, Commands, SourceCommands};
use sitefeed::config::Config;
use sitefeed::domain::SourceType;
use sitefeed::errors::{SiteFeedError, SiteFeedResult};
use sitefeed::fetch::HttpFetcher;
use sitefeed::filter::CsvKeywordFilter;
use sitefeed::services::{ConversionFailure, ConvertRequest, ConvertService, IngestService, SourceService};
use sitefeed::sites::SiteRegistry;
use sitefeed::sources::ReaderRegistry;
use sitefeed::storage::traits::ArticleRepository;
use sitefeed::storage::{SqliteArticleRepository, SqliteSourceRepository, SqliteStorage};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so feed XML on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Feed {
            site,
            limit,
            intelligent,
            output,
        } => {
            let request = ConvertRequest::new(site)
                .with_limit(limit)
                .with_intelligent(intelligent);
            cmd_feed(&request, output.as_deref())
        }
        Commands::Sites => {
            cmd_sites()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Source { command } => {
            let config = Config::from_env()?;
            let storage = SqliteStorage::new(&config.db_path)?;
            let service = SourceService::new(SqliteSourceRepository::new(storage));
            match command {
                SourceCommands::Add {
                    name,
                    url,
                    source_type,
                } => cmd_source_add(&service, &name, &url, source_type)?,
                SourceCommands::List => cmd_source_list(&service)?,
                SourceCommands::Remove { id } => cmd_source_remove(&service, id)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ingest { keywords } => {
            let config = Config::from_env()?;
            let keywords = keywords.unwrap_or_else(|| config.keywords.clone());
            cmd_ingest(&config, keywords)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Articles { all } => {
            let config = Config::from_env()?;
            cmd_articles(&config, all)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn convert(request: &ConvertRequest) -> SiteFeedResult<String> {
    let config = Config::from_env()?;
    let sites = Arc::new(SiteRegistry::builtin()?);
    let service = ConvertService::new(sites, HttpFetcher::new(&config)?);

    service.convert(request)
}

fn cmd_feed(request: &ConvertRequest, output: Option<&std::path::Path>) -> anyhow::Result<ExitCode> {
    let xml = match convert(request) {
        Ok(xml) => xml,
        Err(e) => {
            let failure = ConversionFailure::new(&request.site, &e);
            eprintln!("{}", serde_json::to_string_pretty(&failure)?);
            return Ok(ExitCode::FAILURE);
        }
    };

    match output {
        Some(path) => {
            fs::write(path, &xml)
                .with_context(|| format!("Failed to write feed to {}", path.display()))?;
            println!("Wrote feed for {} to {}", request.site, path.display());
        }
        None => println!("{}", xml),
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_sites() -> anyhow::Result<()> {
    let sites = SiteRegistry::builtin()?;

    println!("Supported sites:\n");
    for profile in sites.profiles() {
        println!("  {} ({})", profile.id, profile.name);
        println!("    URL: {}", profile.base_url);
        println!("    {}", profile.description);
        println!();
    }
    println!("Usage: sitefeed feed <site> [--limit N] [--intelligent]");

    Ok(())
}

fn cmd_source_add(
    service: &SourceService<SqliteSourceRepository>,
    name: &str,
    url: &str,
    source_type: SourceType,
) -> anyhow::Result<()> {
    match service.add(name, url, source_type) {
        Ok(source) => {
            println!("Source added successfully!");
            if let Some(id) = source.id {
                println!("  ID: {}", id);
            }
            println!("  Name: {}", source.name);
            println!("  Type: {}", source.source_type);
            Ok(())
        }
        Err(SiteFeedError::SourceAlreadyExists(_)) => {
            println!("Source already exists: {}", url);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_source_list(service: &SourceService<SqliteSourceRepository>) -> anyhow::Result<()> {
    let sources = service.list()?;

    if sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    println!("Configured sources:\n");
    for source in sources {
        let id = source.id.map(|id| id.to_string()).unwrap_or_default();
        println!("  {}. {} [{}]", id, source.name, source.source_type);
        println!("    URL: {}", source.url);
        println!();
    }

    Ok(())
}

fn cmd_source_remove(service: &SourceService<SqliteSourceRepository>, id: i64) -> anyhow::Result<()> {
    let source = service
        .get(id)?
        .ok_or_else(|| SiteFeedError::SourceNotFound(id.to_string()))?;

    service.remove(id)?;
    println!("Removed: {}", source.name);

    Ok(())
}

fn cmd_ingest(config: &Config, keywords: String) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(&config.db_path)?;
    let sites = Arc::new(SiteRegistry::builtin()?);

    let service = IngestService::new(
        SqliteSourceRepository::new(storage.clone()),
        SqliteArticleRepository::new(storage),
        HttpFetcher::new(config)?,
        CsvKeywordFilter::new(),
        ReaderRegistry::new(sites, config.scrape_limit),
        keywords,
    );

    let report = service.run()?;

    if report.sources_seen == 0 {
        println!("No sources configured.");
        return Ok(());
    }

    if !report.failed.is_empty() {
        println!("Failed {} sources:", report.failed.len());
        for failure in &report.failed {
            println!("  ! {} ({}): {}", failure.source, failure.url, failure.message);
        }
        println!();
    }

    println!(
        "Ingest complete: {} sources, {} new articles ({} filtered), {} already stored",
        report.sources_seen, report.created, report.filtered, report.skipped_existing
    );

    Ok(())
}

fn cmd_articles(config: &Config, include_filtered: bool) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(&config.db_path)?;
    let articles = SqliteArticleRepository::new(storage).list(include_filtered)?;

    if articles.is_empty() {
        println!("No articles stored.");
        return Ok(());
    }

    for listing in articles {
        let article = &listing.record;
        let marker = if article.filtered_out { " [filtered]" } else { "" };
        println!("{}{}", article.title, marker);
        println!(
            "    {} | {}",
            listing.source_name,
            article.published_at.format("%Y-%m-%d %H:%M")
        );
        println!("    {}", article.url);
        println!();
    }

    Ok(())
}
