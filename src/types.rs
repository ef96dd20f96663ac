use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Column order of the CSV output. Downstream analysis depends on it.
pub const SONG_ROW_COLUMNS: [&str; 15] = [
    "show_id",
    "show_date",
    "city",
    "state",
    "country",
    "venue",
    "artist_name",
    "tour_name",
    "festival_flag",
    "set_index",
    "song_index",
    "song_name",
    "is_cover",
    "cover_artist",
    "encore_index",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCandidate {
    pub id: String,
    pub name: String,
    pub sort_name: String,
    pub disambiguation: String,
}

impl From<ApiArtist> for ArtistCandidate {
    fn from(artist: ApiArtist) -> Self {
        ArtistCandidate {
            id: artist.mbid.unwrap_or_default(),
            name: artist.name.unwrap_or_default(),
            sort_name: artist.sort_name.unwrap_or_default(),
            disambiguation: artist.disambiguation.unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct CandidateTableRow {
    #[tabled(rename = "#")]
    pub number: usize,
    pub name: String,
    pub disambiguation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSearchResponse {
    #[serde(default)]
    pub artist: Vec<ApiArtist>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArtist {
    pub mbid: Option<String>,
    pub name: Option<String>,
    pub sort_name: Option<String>,
    pub disambiguation: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistsResponse {
    #[serde(default)]
    pub setlist: Vec<Setlist>,
    pub total: Option<u32>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

/// One show as reported by setlist.fm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    /// Missing on malformed records; such shows produce no rows.
    #[serde(default)]
    pub id: Option<String>,
    /// `dd-MM-yyyy`
    pub event_date: Option<String>,
    pub artist: Option<ArtistRef>,
    pub venue: Option<Venue>,
    pub tour: Option<Tour>,
    #[serde(default)]
    pub sets: Sets,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub mbid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<City>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub name: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub country: Option<Country>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sets {
    #[serde(default)]
    pub set: Vec<Set>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub name: Option<String>,
    /// Encore number; absent on regular sets.
    pub encore: Option<u32>,
    #[serde(default)]
    pub song: Vec<Song>,
}

impl Set {
    pub fn is_encore(&self) -> bool {
        self.encore.is_some_and(|n| n > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub name: Option<String>,
    pub cover: Option<ArtistRef>,
    pub with: Option<ArtistRef>,
    pub info: Option<String>,
    #[serde(default)]
    pub tape: bool,
}

/// One song performance, the unit written to CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRow {
    pub show_id: String,
    pub show_date: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub venue: String,
    pub artist_name: String,
    pub tour_name: String,
    #[serde(with = "bool_as_int")]
    pub festival_flag: bool,
    pub set_index: u32,
    pub song_index: u32,
    pub song_name: String,
    #[serde(with = "bool_as_int")]
    pub is_cover: bool,
    pub cover_artist: String,
    pub encore_index: Option<u32>,
}

mod bool_as_int {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::custom(format!("expected 0 or 1, got {other}"))),
        }
    }
}
