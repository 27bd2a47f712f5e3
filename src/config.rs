use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Public copy of the titles dataset tried first.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/krishnaik06/Netflix-Data-Analysis/main/netflix_titles.csv";

/// Local fallback, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "netflix_titles.csv";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Runtime configuration (environment only)
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
///
/// * `CATALOG_DATA_URL` – remote CSV; set it to an empty string to skip the remote attempt
/// * `CATALOG_DATA_PATH` – local fallback (`.csv`, `.json` or `.parquet`)
/// * `CATALOG_FETCH_TIMEOUT_SECS` – timeout for the remote fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub remote_url: Option<String>,
    pub local_path: Option<PathBuf>,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: Some(DEFAULT_DATA_URL.to_string()),
            local_path: Some(PathBuf::from(DEFAULT_DATA_PATH)),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let remote_url = match get("CATALOG_DATA_URL") {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url),
            None => defaults.remote_url,
        };

        let local_path = match get("CATALOG_DATA_PATH") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => defaults.local_path,
        };

        let fetch_timeout = match get("CATALOG_FETCH_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("CATALOG_FETCH_TIMEOUT_SECS={secs:?} is not a number of seconds"))?,
            ),
            None => defaults.fetch_timeout,
        };

        Ok(Config {
            remote_url,
            local_path,
            fetch_timeout,
        })
    }
}
