use std::io::{BufRead, Write};

use tabled::Table;

use crate::{
    Res,
    error::ScrapeError,
    info,
    setlistfm::client::{Sleeper, SetlistClient, Transport},
    types::{ArtistCandidate, ArtistSearchResponse, CandidateTableRow},
};

/// Picks one artist out of several search results.
pub trait CandidateSelector {
    /// Returns the index into `candidates` of the chosen artist.
    fn select(&mut self, query: &str, candidates: &[ArtistCandidate]) -> Res<usize>;
}

/// Non-interactive choice: an exact (case-insensitive) name match if there is
/// one, otherwise the most relevant result.
#[derive(Debug, Default, Clone, Copy)]
pub struct BestMatchSelector;

impl CandidateSelector for BestMatchSelector {
    fn select(&mut self, query: &str, candidates: &[ArtistCandidate]) -> Res<usize> {
        let wanted = query.trim().to_lowercase();
        Ok(candidates
            .iter()
            .position(|c| c.name.to_lowercase() == wanted)
            .unwrap_or(0))
    }
}

/// Asks the user through a numbered table.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> CandidateSelector for PromptSelector<R, W> {
    fn select(&mut self, query: &str, candidates: &[ArtistCandidate]) -> Res<usize> {
        let rows: Vec<CandidateTableRow> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| CandidateTableRow {
                number: i + 1,
                name: c.name.clone(),
                disambiguation: c.disambiguation.clone(),
            })
            .collect();

        let io_err = |e: std::io::Error| ScrapeError::Selection(e.to_string());

        writeln!(
            self.output,
            "Several artists match {query:?}:\n{}",
            Table::new(rows)
        )
        .map_err(io_err)?;

        loop {
            write!(self.output, "Pick an artist [1-{}]: ", candidates.len()).map_err(io_err)?;
            self.output.flush().map_err(io_err)?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).map_err(io_err)?;
            let answer = line.trim();
            if read == 0 || answer.is_empty() {
                return Err(ScrapeError::Selection("no artist chosen".to_string()));
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=candidates.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.output, "{answer:?} is not a valid choice.").map_err(io_err)?,
            }
        }
    }
}

/// Resolves a free-text artist name to a single setlist.fm artist.
///
/// Searches `/search/artists` ordered by relevance. A single hit is taken as
/// is; with several hits the `selector` decides. Matching itself is left to
/// setlist.fm.
///
/// # Arguments
///
/// * `client` - The client used for the search request
/// * `artist_name` - Free-text name as typed by the user
/// * `selector` - Decides between several candidates
///
/// # Returns
///
/// The chosen artist with its MusicBrainz identifier.
///
/// # Errors
///
/// - [`ScrapeError::InvalidInput`] for a blank name (no request is made)
/// - [`ScrapeError::NotFound`] when the search has no results
/// - [`ScrapeError::Selection`] when the selector fails or picks an invalid index
/// - any client error from the search request
///
/// # Example
///
/// ```
/// use setlistcli::{
///     config::Config,
///     setlistfm::{BestMatchSelector, SetlistClient, resolve_artist},
/// };
///
/// let client = SetlistClient::new(&Config::new("my-api-key"))?;
/// let artist = resolve_artist(&client, "Pearl Jam", &mut BestMatchSelector)?;
/// println!("{} -> {}", artist.name, artist.id);
/// # Ok::<(), setlistcli::error::ScrapeError>(())
/// ```
pub fn resolve_artist<T, S, C>(
    client: &SetlistClient<T, S>,
    artist_name: &str,
    selector: &mut C,
) -> Res<ArtistCandidate>
where
    T: Transport,
    S: Sleeper,
    C: CandidateSelector + ?Sized,
{
    let name = artist_name.trim();
    if name.is_empty() {
        return Err(ScrapeError::InvalidInput(
            "artist name must not be empty".to_string(),
        ));
    }

    info!("Searching for artist: {name:?}");
    let candidates = search_artists(client, name)?;

    let chosen = match candidates.len() {
        0 => {
            return Err(ScrapeError::NotFound(format!(
                "no artist matches {name:?}"
            )));
        }
        1 => 0,
        _ => selector.select(name, &candidates)?,
    };

    candidates.into_iter().nth(chosen).ok_or_else(|| {
        ScrapeError::Selection(format!("choice {} is out of range", chosen + 1))
    })
}

/// First page of search results; setlist.fm answers 404 when nothing matches.
pub fn search_artists<T: Transport, S: Sleeper>(
    client: &SetlistClient<T, S>,
    artist_name: &str,
) -> Res<Vec<ArtistCandidate>> {
    let query = [
        ("artistName", artist_name.to_string()),
        ("p", "1".to_string()),
        ("sort", "relevance".to_string()),
    ];

    match client.get_json::<ArtistSearchResponse>("search/artists", &query) {
        Ok(response) => Ok(response
            .artist
            .into_iter()
            .filter(|a| a.mbid.as_deref().is_some_and(|mbid| !mbid.trim().is_empty()))
            .map(ArtistCandidate::from)
            .collect()),
        Err(ScrapeError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
