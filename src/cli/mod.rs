//! # CLI Module
//!
//! User-facing commands of setlistcli. The binary parses arguments and builds a
//! [`crate::config::Config`]; the functions here turn that into a scrape run
//! and report the result.
//!
//! ```text
//! CLI Layer (arguments, prompts, status output)
//!     ↓
//! Pipeline (resolve, fetch, flatten, write)
//!     ↓
//! setlist.fm client (HTTP, backoff)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! setlistcli "Pearl Jam"                  # ask when several artists match
//! setlistcli "Pearl Jam" --first          # take the best match
//! setlistcli "Phish" --output-dir ./data  # write somewhere else
//! setlistcli completions zsh > _setlistcli
//! ```
//!
//! Status lines use the `info!`, `success!` and `warning!` macros; fatal
//! errors go through `error!` and name the failing stage.

mod fetch;

pub use fetch::fetch;
