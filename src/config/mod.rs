use std::time::Duration;

use crate::errors::{SiteFeedError, SiteFeedResult};

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub keywords: String,
    pub fetch_timeout: Duration,
    pub scrape_limit: usize,
    pub user_agent: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> SiteFeedResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let default_db = exe_dir
            .map(|d| d.join("sitefeed.db").to_string_lossy().into_owned())
            .unwrap_or_else(|| "./sitefeed.db".to_string());

        Self::from_lookup(|key| std::env::var(key).ok(), default_db)
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, default_db: String) -> SiteFeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("SITEFEED_DB_PATH").unwrap_or(default_db);

        let keywords = lookup("KEYWORDS").unwrap_or_default();

        let timeout_secs = match lookup("SITEFEED_FETCH_TIMEOUT_SECS") {
            Some(raw) => parse_number("SITEFEED_FETCH_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };
        // Fetches must stay short; anything outside single-digit seconds is rejected.
        if !(1..=9).contains(&timeout_secs) {
            return Err(SiteFeedError::Config(format!(
                "SITEFEED_FETCH_TIMEOUT_SECS must be between 1 and 9, got {}",
                timeout_secs
            )));
        }

        let scrape_limit = match lookup("SITEFEED_SCRAPE_LIMIT") {
            Some(raw) => parse_number("SITEFEED_SCRAPE_LIMIT", &raw)? as usize,
            None => DEFAULT_LIMIT,
        };
        if scrape_limit == 0 {
            return Err(SiteFeedError::Config(
                "SITEFEED_SCRAPE_LIMIT must be a positive integer".to_string(),
            ));
        }

        let user_agent = lookup("SITEFEED_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            db_path,
            keywords,
            fetch_timeout: Duration::from_secs(timeout_secs),
            scrape_limit,
            user_agent,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> SiteFeedResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| SiteFeedError::Config(format!("{} must be a number, got '{}'", key, raw)))
}
