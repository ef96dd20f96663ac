//! Flattening of nested setlists into per-song rows.
//!
//! Numbering rules:
//! - `set_index` counts the sets of a show that produce at least one row,
//!   starting at 1.
//! - `song_index` runs from 1 across the whole show and does not reset per set.
//! - `encore_index` counts encore sets the same way `set_index` counts sets,
//!   and is only filled on rows of encore sets.
//!
//! Sets without usable songs therefore never leave gaps in either index.

use crate::{
    types::{Setlist, SongRow},
    utils,
};

/// A song entry that was dropped during flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSong {
    pub show_id: String,
    /// 1-based position of the set in the raw record.
    pub set_position: usize,
    /// 1-based position of the song in the raw set.
    pub song_position: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub rows: Vec<SongRow>,
    pub skipped: Vec<SkippedSong>,
    /// Why the whole show was dropped, if it was.
    pub rejected: Option<String>,
}

struct ShowFields {
    show_id: String,
    show_date: String,
    city: String,
    state: String,
    country: String,
    venue: String,
    artist_name: String,
    tour_name: String,
    festival_flag: bool,
}

impl ShowFields {
    fn from_setlist(show_id: &str, setlist: &Setlist) -> Self {
        let venue = setlist.venue.as_ref();
        let city = venue.and_then(|v| v.city.as_ref());

        let venue_name = venue.and_then(|v| v.name.clone()).unwrap_or_default();
        let tour_name = setlist
            .tour
            .as_ref()
            .and_then(|t| t.name.clone())
            .unwrap_or_default();

        ShowFields {
            show_id: show_id.to_string(),
            show_date: setlist
                .event_date
                .as_deref()
                .map(utils::normalize_event_date)
                .unwrap_or_default(),
            city: city.and_then(|c| c.name.clone()).unwrap_or_default(),
            state: city.and_then(|c| c.state.clone()).unwrap_or_default(),
            country: city
                .and_then(|c| c.country.as_ref())
                .and_then(|c| c.name.clone())
                .unwrap_or_default(),
            artist_name: setlist
                .artist
                .as_ref()
                .and_then(|a| a.name.clone())
                .unwrap_or_default(),
            festival_flag: utils::is_festival(&venue_name, &tour_name),
            venue: venue_name,
            tour_name,
        }
    }

    fn row(&self, set_index: u32, song_index: u32) -> SongRow {
        SongRow {
            show_id: self.show_id.clone(),
            show_date: self.show_date.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            venue: self.venue.clone(),
            artist_name: self.artist_name.clone(),
            tour_name: self.tour_name.clone(),
            festival_flag: self.festival_flag,
            set_index,
            song_index,
            song_name: String::new(),
            is_cover: false,
            cover_artist: String::new(),
            encore_index: None,
        }
    }
}

/// Turns one show into one row per performed song, in performance order.
///
/// Songs without a name are not fatal: they land in [`Flattened::skipped`]
/// and the rest of the show is kept. A show without sets yields no rows, and
/// a show without an id yields none either and is marked
/// [`Flattened::rejected`].
pub fn flatten_setlist(setlist: &Setlist) -> Flattened {
    let Some(show_id) = setlist
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return Flattened {
            rejected: Some("show has no id".to_string()),
            ..Flattened::default()
        };
    };

    let show = ShowFields::from_setlist(show_id, setlist);
    let mut flattened = Flattened::default();

    let mut set_index = 0;
    let mut encore_index = 0;
    let mut song_index = 0;

    for (set_pos, set) in setlist.sets.set.iter().enumerate() {
        let mut named = Vec::with_capacity(set.song.len());
        for (song_pos, song) in set.song.iter().enumerate() {
            match song.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => named.push((name, song)),
                _ => flattened.skipped.push(SkippedSong {
                    show_id: show.show_id.clone(),
                    set_position: set_pos + 1,
                    song_position: song_pos + 1,
                    reason: "song has no name".to_string(),
                }),
            }
        }

        if named.is_empty() {
            continue;
        }

        set_index += 1;
        let encore = if set.is_encore() {
            encore_index += 1;
            Some(encore_index)
        } else {
            None
        };

        for (name, song) in named {
            song_index += 1;

            let cover_artist = song
                .cover
                .as_ref()
                .and_then(|c| c.name.as_deref())
                .map(str::trim)
                .unwrap_or_default()
                .to_string();

            let mut row = show.row(set_index, song_index);
            row.song_name = name.to_string();
            row.is_cover = !cover_artist.is_empty();
            row.cover_artist = cover_artist;
            row.encore_index = encore;
            flattened.rows.push(row);
        }
    }

    flattened
}
