//! Configuration management for setlistcli.
//!
//! Values come from environment variables, optionally seeded from `.env` files:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the local data directory (`<data_local_dir>/setlistcli/.env`)
//! 3. `.env` in the working directory
//! 4. Application defaults
//!
//! The result is an explicit [`Config`] value that gets handed to the client and
//! the pipeline. Nothing below this module reads the process environment.

use std::{env, path::PathBuf, time::Duration};

use crate::{Res, error::ScrapeError, setlistfm::RetryPolicy};

pub const DEFAULT_API_URL: &str = "https://api.setlist.fm/rest/1.0";
pub const DEFAULT_OUTPUT_DIR: &str = "data/raw";

pub const ENV_API_KEY: &str = "SETLIST_FM_API_KEY";
pub const ENV_API_URL: &str = "SETLIST_FM_API_URL";
pub const ENV_OUTPUT_DIR: &str = "SETLISTCLI_OUTPUT_DIR";
pub const ENV_TIMEOUT_SECS: &str = "SETLISTCLI_TIMEOUT_SECS";
pub const ENV_PAGE_DELAY_MS: &str = "SETLISTCLI_PAGE_DELAY_MS";
pub const ENV_MAX_RETRIES: &str = "SETLISTCLI_MAX_RETRIES";
pub const ENV_INITIAL_BACKOFF_MS: &str = "SETLISTCLI_INITIAL_BACKOFF_MS";
pub const ENV_MAX_BACKOFF_MS: &str = "SETLISTCLI_MAX_BACKOFF_MS";

/// Loads `.env` files from the local data directory and the working directory.
///
/// Creates `<data_local_dir>/setlistcli/` if needed so users know where to put
/// their `.env`. A missing `.env` is not an error: the API key may just as well
/// come straight from the environment.
///
/// # Returns
///
/// `Ok(())` once every `.env` file that exists has been applied to the
/// process environment. Variables that are already set are not overridden.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use setlistcli::{config::{self, Config}, warning};
///
/// if let Err(e) = config::load_env() {
///     warning!("Cannot load .env file. Err: {}", e);
/// }
/// let config = Config::from_env()?;
/// println!("writing to {}", config.output_dir.display());
/// # Ok::<(), setlistcli::error::ScrapeError>(())
/// ```
pub fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("setlistcli/.env");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub output_dir: PathBuf,
    /// Per-request timeout of the HTTP client.
    pub timeout: Duration,
    /// Pause between two page requests.
    pub page_delay: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: Duration::from_secs(30),
            page_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Auth`] if `SETLIST_FM_API_KEY` is missing or blank
    /// - [`ScrapeError::Config`] if a numeric setting cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ScrapeError::Auth(format!(
                    "{ENV_API_KEY} is not set. Add it to your environment or .env file"
                ))
            })?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|d| !d.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(secs) = parse_number(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_number(&lookup, ENV_PAGE_DELAY_MS)? {
            config.page_delay = Duration::from_millis(ms);
        }
        if let Some(retries) = parse_number(&lookup, ENV_MAX_RETRIES)? {
            config.retry.max_retries = u32::try_from(retries).map_err(|_| {
                ScrapeError::Config(format!("{ENV_MAX_RETRIES} is out of range: {retries}"))
            })?;
        }
        if let Some(ms) = parse_number(&lookup, ENV_INITIAL_BACKOFF_MS)? {
            config.retry.initial_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number(&lookup, ENV_MAX_BACKOFF_MS)? {
            config.retry.max_backoff = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Res<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ScrapeError::Config(format!("{key}={raw:?} is not a number: {e}"))),
        _ => Ok(None),
    }
}
