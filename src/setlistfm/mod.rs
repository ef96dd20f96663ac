//! # setlist.fm Integration Module
//!
//! Blocking client for the setlist.fm REST API (version 1.0) plus the two
//! higher-level operations the scraper needs.
//!
//! ```text
//! Pipeline
//!    ↓
//! artists::resolve_artist      setlists::SetlistPages
//!    ↓                             ↓
//! client::SetlistClient::get_json (auth header, 429 backoff)
//!    ↓
//! client::Transport (reqwest blocking client)
//!    ↓
//! setlist.fm
//! ```
//!
//! ## Endpoints
//!
//! - `GET /search/artists?artistName=..&p=1&sort=relevance` - artist search
//! - `GET /artist/{mbid}/setlists?p=N` - paginated setlists of one artist
//!
//! ## Rate Limiting
//!
//! setlist.fm allows only a couple of requests per second per key. Pages are
//! fetched one after another with a configurable pause between them, and 429
//! answers are retried with capped exponential backoff (see [`RetryPolicy`]).
//! Server-provided `Retry-After` values are honoured up to the cap.
//!
//! ## Testing Seams
//!
//! Network access goes through the [`Transport`] trait and waiting through the
//! [`Sleeper`] trait, so the client can be driven by scripted responses without
//! real delays.

pub mod artists;
pub mod client;
pub mod setlists;

pub use artists::{BestMatchSelector, CandidateSelector, PromptSelector, resolve_artist};
pub use client::{
    HttpResponse, ReqwestTransport, RetryPolicy, SetlistClient, Sleeper, ThreadSleeper,
    Transport,
};
pub use setlists::SetlistPages;
