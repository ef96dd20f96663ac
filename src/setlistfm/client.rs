use std::{thread, time::Duration};

use reqwest::{
    blocking::Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, RETRY_AFTER},
};
use serde::de::DeserializeOwned;

use crate::{Res, config::Config, error::ScrapeError, warning};

/// A raw HTTP answer, before any status handling.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// `Retry-After` in seconds, when the server sent one.
    pub retry_after: Option<u64>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }
}

/// Performs a single GET request. Implementations must not retry.
pub trait Transport {
    fn get(&self, url: &str, query: &[(&str, String)], api_key: &str) -> Res<HttpResponse>;
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Exponential backoff for 429 responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first rate-limited attempt.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Cap for a single delay, including server-requested ones.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based): `initial * 2^attempt`,
    /// raised to `Retry-After` if that is longer, capped at `max_backoff`.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        let exponential = 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.initial_backoff.checked_mul(factor))
            .unwrap_or(self.max_backoff);
        let requested = retry_after.map(Duration::from_secs).unwrap_or_default();

        exponential.max(requested).min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Production transport on top of reqwest's blocking client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Res<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ScrapeError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, query: &[(&str, String)], api_key: &str) -> Res<HttpResponse> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("x-api-key", api_key)
            .send()
            .map_err(|e| ScrapeError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response
            .text()
            .map_err(|e| ScrapeError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Authenticated access to the setlist.fm REST API.
pub struct SetlistClient<T: Transport = ReqwestTransport, S: Sleeper = ThreadSleeper> {
    transport: T,
    sleeper: S,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl SetlistClient {
    /// Builds the production client. Fails with [`ScrapeError::Auth`] before any
    /// network traffic when the key is blank.
    pub fn new(config: &Config) -> Res<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(transport, ThreadSleeper, config)
    }
}

impl<T: Transport, S: Sleeper> SetlistClient<T, S> {
    pub fn with_transport(transport: T, sleeper: S, config: &Config) -> Res<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ScrapeError::Auth("the setlist.fm API key is empty".to_string()));
        }

        Ok(Self {
            transport,
            sleeper,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            retry: config.retry.clone(),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// GETs `path` and decodes the JSON body.
    ///
    /// 429 answers are retried according to the [`RetryPolicy`], sleeping
    /// `min(max(initial * 2^n, Retry-After), max_backoff)` before retry `n`.
    /// Every other failure is returned right away.
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint path relative to the API base URL, e.g. `search/artists`
    /// * `query` - Query parameters appended to the request
    ///
    /// # Returns
    ///
    /// The decoded response body.
    ///
    /// # Errors
    ///
    /// - 401/403 -> [`ScrapeError::Auth`]
    /// - 404 -> [`ScrapeError::NotFound`] carrying the URL
    /// - 429 after `max_retries` retries -> [`ScrapeError::RateLimited`]
    /// - other non-2xx -> [`ScrapeError::Http`]
    /// - a body that does not match `R` -> [`ScrapeError::Decode`]
    /// - transport failures are passed through unchanged
    ///
    /// # Example
    ///
    /// ```
    /// use setlistcli::{config::Config, setlistfm::SetlistClient, types::ArtistSearchResponse};
    ///
    /// let client = SetlistClient::new(&Config::new("my-api-key"))?;
    /// let found: ArtistSearchResponse = client.get_json(
    ///     "search/artists",
    ///     &[("artistName", "Phish".to_string()), ("p", "1".to_string())],
    /// )?;
    /// println!("{} candidates", found.artist.len());
    /// # Ok::<(), setlistcli::error::ScrapeError>(())
    /// ```
    pub fn get_json<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Res<R> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut attempt: u32 = 0;

        loop {
            let response = self.transport.get(&url, query, &self.api_key)?;

            match response.status {
                200..=299 => {
                    return serde_json::from_str(&response.body)
                        .map_err(|source| ScrapeError::Decode { url, source });
                }
                401 | 403 => {
                    return Err(ScrapeError::Auth(format!(
                        "setlist.fm rejected the API key (HTTP {})",
                        response.status
                    )));
                }
                404 => return Err(ScrapeError::NotFound(url)),
                429 => {
                    if attempt >= self.retry.max_retries {
                        return Err(ScrapeError::RateLimited {
                            attempts: attempt + 1,
                        });
                    }
                    let delay = self.retry.delay_for(attempt, response.retry_after);
                    warning!(
                        "Rate limited by setlist.fm, retrying in {} ms ({}/{})",
                        delay.as_millis(),
                        attempt + 1,
                        self.retry.max_retries
                    );
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                status => return Err(ScrapeError::Http { status, url }),
            }
        }
    }

    pub(crate) fn pause(&self, duration: Duration) {
        self.sleeper.sleep(duration);
    }
}
