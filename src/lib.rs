//! setlist.fm Setlist Scraper Library
//!
//! This library scrapes the concert setlists of a single artist from the
//! setlist.fm REST API, flattens them into one row per performed song and
//! stores the rows as CSV for later analysis.
//!
//! # Modules
//!
//! - `cli` - Command implementations used by the binary
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error taxonomy and pipeline stages
//! - `management` - CSV persistence of song rows
//! - `pipeline` - Resolve, fetch, flatten and write for one artist
//! - `setlistfm` - setlist.fm API client, artist resolver and paginator
//! - `transform` - Flattening of nested setlists into song rows
//! - `types` - API data structures and the persisted row type
//! - `utils` - Path, date and progress helpers
//!
//! # Example
//!
//! ```
//! use setlistcli::{config::Config, pipeline, setlistfm::{BestMatchSelector, SetlistClient}};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = SetlistClient::new(&config)?;
//!     let summary = pipeline::run(&client, &config, "Pearl Jam", &mut BestMatchSelector)?;
//!     println!("{} rows written to {}", summary.rows, summary.path.display());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod setlistfm;
pub mod transform;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation of the library reports a
/// [`error::ScrapeError`].
///
/// # Example
///
/// ```
/// use setlistcli::Res;
///
/// fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, error::ScrapeError>;

/// Prints a status line with a blue `o` marker to stdout.
///
/// ```
/// info!("Searching for artist: {:?}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line with a green `✓` marker to stdout.
///
/// ```
/// success!("Wrote {} rows to {}", rows, path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with code 1.
///
/// Only for fatal errors in the binary; library code returns errors instead.
///
/// ```
/// error!("{}", stage_error);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr for recoverable problems such as
/// skipped songs or rate-limit retries.
///
/// ```
/// warning!("Rate limited, retrying in {} ms", delay);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
