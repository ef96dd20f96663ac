use std::time::Duration;

use crate::{
    Res,
    error::ScrapeError,
    setlistfm::client::{Sleeper, SetlistClient, Transport},
    types::{Setlist, SetlistsResponse},
};

/// Lazily walks the pages of `/artist/{mbid}/setlists`.
///
/// Every pull fetches one page and yields its setlists. The first answer
/// decides how far the walk goes: with `total` and `itemsPerPage` the page
/// count is known up front, with only `total` pages are fetched until that
/// many setlists were seen. The walk also ends on the first empty page.
///
/// A 404 on the first page means the artist has no setlists and ends the walk
/// quietly. A 404 on a later page while the reported total is not reached yet
/// is yielded as an error. After an error has been yielded the iterator is
/// done.
///
/// # Arguments
///
/// * `client` - The client used for every page request
/// * `artist_id` - MusicBrainz identifier of the artist
/// * `page_delay` - Pause before every page after the first
///
/// # Returns
///
/// An iterator of `Res<Vec<Setlist>>`, one item per non-empty page.
///
/// # Errors
///
/// Yields the client's errors (`Auth`, `RateLimited`, `Http`, `Decode`,
/// `Transport`) and `NotFound` for a missing page inside the reported range.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use setlistcli::{config::Config, setlistfm::{SetlistClient, SetlistPages}};
///
/// let config = Config::new("my-api-key");
/// let client = SetlistClient::new(&config)?;
/// let mbid = "83b9cbe7-9857-49e2-ab8e-b57b01038103";
/// for page in SetlistPages::new(&client, mbid, Duration::from_millis(500)) {
///     for setlist in page? {
///         println!("{:?}", setlist.event_date);
///     }
/// }
/// # Ok::<(), setlistcli::error::ScrapeError>(())
/// ```
pub struct SetlistPages<'a, T: Transport, S: Sleeper> {
    client: &'a SetlistClient<T, S>,
    artist_id: String,
    page_delay: Duration,
    next_page: u32,
    total_pages: Option<u32>,
    total_setlists: Option<u32>,
    seen: u32,
    done: bool,
}

impl<'a, T: Transport, S: Sleeper> SetlistPages<'a, T, S> {
    pub fn new(client: &'a SetlistClient<T, S>, artist_id: &str, page_delay: Duration) -> Self {
        Self {
            client,
            artist_id: artist_id.to_string(),
            page_delay,
            next_page: 1,
            total_pages: None,
            total_setlists: None,
            seen: 0,
            done: false,
        }
    }

    /// Known after the first page, if it reported a page size.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn total_setlists(&self) -> Option<u32> {
        self.total_setlists
    }

    /// Number of setlists yielded so far.
    pub fn seen(&self) -> u32 {
        self.seen
    }

    /// Number of the page the next pull will request.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Whether the first page's metadata says more setlists are due.
    fn expects_more(&self) -> bool {
        match (self.total_pages, self.total_setlists) {
            (Some(pages), _) => self.next_page <= pages,
            (None, Some(total)) => self.seen < total,
            (None, None) => true,
        }
    }

    fn has_metadata(&self) -> bool {
        self.total_pages.is_some() || self.total_setlists.is_some()
    }

    fn fetch_page(&self, page: u32) -> Res<SetlistsResponse> {
        let path = format!("artist/{}/setlists", self.artist_id);
        self.client
            .get_json::<SetlistsResponse>(&path, &[("p", page.to_string())])
    }
}

impl<T: Transport, S: Sleeper> Iterator for SetlistPages<'_, T, S> {
    type Item = Res<Vec<Setlist>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page = self.next_page;
        if page > 1 && !self.expects_more() {
            self.done = true;
            return None;
        }

        if page > 1 {
            self.client.pause(self.page_delay);
        }

        let response = match self.fetch_page(page) {
            Ok(response) => response,
            // setlist.fm answers 404 for artists without setlists. Without a
            // total to check against, a later 404 is the end as well.
            Err(ScrapeError::NotFound(_)) if page == 1 || !self.has_metadata() => {
                self.done = true;
                return None;
            }
            Err(ScrapeError::NotFound(url)) => {
                self.done = true;
                return Some(Err(ScrapeError::NotFound(format!(
                    "page {page} of {} setlists for artist {} ({} fetched so far): {url}",
                    self.total_setlists.unwrap_or_default(),
                    self.artist_id,
                    self.seen
                ))));
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        if page == 1 {
            self.total_setlists = response.total;
            self.total_pages = page_count(response.total, response.items_per_page);
        }

        self.next_page += 1;

        if response.setlist.is_empty() {
            self.done = true;
            return None;
        }

        let count = u32::try_from(response.setlist.len()).unwrap_or(u32::MAX);
        self.seen = self.seen.saturating_add(count);
        Some(Ok(response.setlist))
    }
}

/// `ceil(total / per_page)`, or `None` when either value is missing or the
/// page size is zero.
fn page_count(total: Option<u32>, items_per_page: Option<u32>) -> Option<u32> {
    match (total, items_per_page) {
        (Some(total), Some(per_page)) if per_page > 0 => Some(total.div_ceil(per_page)),
        _ => None,
    }
}
