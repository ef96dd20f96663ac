//! Resolve -> fetch -> flatten -> write, for one artist.

use std::path::PathBuf;

use crate::{
    config::Config,
    error::{Stage, StageError},
    info,
    management::SetlistFileManager,
    setlistfm::{CandidateSelector, SetlistClient, SetlistPages, Sleeper, Transport, resolve_artist},
    transform::flatten_setlist,
    types::{ArtistCandidate, SongRow},
    utils, warning,
};

#[derive(Debug, Clone)]
pub struct FetchSummary {
    pub artist: ArtistCandidate,
    pub shows: usize,
    pub rows: usize,
    pub skipped: usize,
    /// Shows dropped as a whole, e.g. for a missing id.
    pub skipped_shows: usize,
    pub path: PathBuf,
}

/// Scrapes every setlist of `artist_name` into
/// `<config.output_dir>/<slug>_setlists.csv`.
///
/// All pages are fetched before anything is written, so a failure in any
/// stage leaves the destination file as it was. Rows are ordered by show date
/// (oldest first) and by performance order within a show.
pub fn run<T, S, C>(
    client: &SetlistClient<T, S>,
    config: &Config,
    artist_name: &str,
    selector: &mut C,
) -> Result<FetchSummary, StageError>
where
    T: Transport,
    S: Sleeper,
    C: CandidateSelector + ?Sized,
{
    let artist = resolve_artist(client, artist_name, selector)
        .map_err(|e| StageError::new(Stage::Resolve, e))?;
    info!("Using {} (MBID: {})", artist.name, artist.id);

    let fetched =
        fetch_rows(client, config, &artist).map_err(|e| StageError::new(Stage::Fetch, e))?;

    let file = SetlistFileManager::new(&config.output_dir, artist_name);
    file.save(&fetched.rows)
        .map_err(|e| StageError::new(Stage::Write, e))?;

    Ok(FetchSummary {
        artist,
        shows: fetched.shows,
        rows: fetched.rows.len(),
        skipped: fetched.skipped,
        skipped_shows: fetched.skipped_shows,
        path: file.path().to_path_buf(),
    })
}

#[derive(Default)]
struct Fetched {
    rows: Vec<SongRow>,
    shows: usize,
    skipped: usize,
    skipped_shows: usize,
}

fn fetch_rows<T: Transport, S: Sleeper>(
    client: &SetlistClient<T, S>,
    config: &Config,
    artist: &ArtistCandidate,
) -> crate::Res<Fetched> {
    let pb = utils::spinner(&format!("Fetching setlists for {}...", artist.name));

    let mut pages = SetlistPages::new(client, &artist.id, config.page_delay);
    let mut fetched = Fetched::default();

    while let Some(page) = pages.next() {
        let setlists = match page {
            Ok(setlists) => setlists,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        for setlist in &setlists {
            let flattened = flatten_setlist(setlist);
            if let Some(reason) = &flattened.rejected {
                pb.suspend(|| {
                    warning!(
                        "Skipping show of {} at {}: {}",
                        setlist.event_date.as_deref().unwrap_or("unknown date"),
                        setlist
                            .venue
                            .as_ref()
                            .and_then(|v| v.name.as_deref())
                            .unwrap_or("unknown venue"),
                        reason
                    )
                });
                fetched.skipped_shows += 1;
                continue;
            }
            for skip in &flattened.skipped {
                pb.suspend(|| {
                    warning!(
                        "Skipping song {} of set {} in show {}: {}",
                        skip.song_position,
                        skip.set_position,
                        skip.show_id,
                        skip.reason
                    )
                });
            }
            fetched.skipped += flattened.skipped.len();
            fetched.rows.extend(flattened.rows);
            fetched.shows += 1;
        }

        let progress = match (pages.total_pages(), pages.total_setlists()) {
            (Some(total), _) => format!("page {}/{}", pages.next_page() - 1, total),
            (None, Some(total)) => format!("{}/{} setlists", pages.seen(), total),
            (None, None) => format!("page {}", pages.next_page() - 1),
        };
        pb.set_message(format!(
            "Fetched {} ({} shows, {} songs)...",
            progress,
            fetched.shows,
            fetched.rows.len()
        ));
    }

    pb.finish_and_clear();
    utils::sort_rows_chronologically(&mut fetched.rows);

    Ok(fetched)
}
