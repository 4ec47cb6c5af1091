use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_LIMIT;
use crate::domain::SourceType;

#[derive(Parser)]
#[command(name = "sitefeed")]
#[command(about = "Turn article listing pages into RSS feeds and a deduplicated article store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an RSS feed for a supported site (e.g. a16z.com)
    Feed {
        /// Site identifier, see `sitefeed sites`
        site: String,

        /// Maximum number of items in the feed
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Skip the site's selector rules and use heuristic extraction only
        #[arg(long)]
        intelligent: bool,

        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported sites
    Sites,

    /// Manage ingestion sources
    Source {
        #[command(subcommand)]
        command: SourceCommands,
    },

    /// Poll every source once and store new articles
    Ingest {
        /// Comma-separated keywords; articles matching none are stored as filtered
        #[arg(long, env = "KEYWORDS", hide_env_values = true)]
        keywords: Option<String>,
    },

    /// List stored articles, newest first
    Articles {
        /// Include articles that did not match the keyword filter
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum SourceCommands {
    /// Add a source to poll
    Add {
        /// Display name
        name: String,

        /// Feed, API or page URL
        url: String,

        /// Source kind: rss, json or scrape
        #[arg(short = 't', long = "type", default_value = "rss")]
        source_type: SourceType,
    },

    /// List configured sources
    List,

    /// Remove a source and its stored articles
    Remove {
        /// Source id as shown by `source list`
        id: i64,
    },
}
