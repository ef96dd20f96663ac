#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::VecDeque,
    path::Path,
    time::Duration,
};

use serde_json::{Value, json};
use setlistcli::{
    Res,
    config::Config,
    error::ScrapeError,
    setlistfm::{HttpResponse, RetryPolicy, SetlistClient, Sleeper, Transport},
    types::{ArtistRef, City, Country, Set, Setlist, Sets, Song, Tour, Venue},
};

/// A request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub api_key: String,
}

impl Request {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Res<HttpResponse>>>,
    requests: RefCell<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    pub fn respond_raw(self, response: HttpResponse) -> Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: ScrapeError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn rate_limited(self, times: usize) -> Self {
        for _ in 0..times {
            self.responses
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(429, "{\"code\":429}")));
        }
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, query: &[(&str, String)], api_key: &str) -> Res<HttpResponse> {
        self.requests.borrow_mut().push(Request {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            api_key: api_key.to_string(),
        });

        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {url}"))
    }
}

/// Remembers requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

pub const API_URL: &str = "https://api.setlist.fm/rest/1.0";

pub fn test_config(output_dir: &Path) -> Config {
    Config {
        api_url: API_URL.to_string(),
        output_dir: output_dir.to_path_buf(),
        page_delay: Duration::ZERO,
        retry: RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
        },
        ..Config::new("test-key")
    }
}

pub fn client(
    transport: ScriptedTransport,
    config: &Config,
) -> SetlistClient<ScriptedTransport, RecordingSleeper> {
    SetlistClient::with_transport(transport, RecordingSleeper::new(), config)
        .expect("client builds with a test key")
}

// ---------- JSON fixtures ----------

pub fn artist_json(mbid: &str, name: &str) -> Value {
    json!({
        "mbid": mbid,
        "name": name,
        "sortName": name,
        "disambiguation": "",
        "url": format!("https://www.setlist.fm/setlists/{mbid}.html")
    })
}

pub fn search_json(artists: Vec<Value>) -> Value {
    json!({
        "type": "artists",
        "itemsPerPage": 30,
        "page": 1,
        "total": artists.len(),
        "artist": artists
    })
}

pub fn setlist_json(id: &str, date: &str, songs: &[&str]) -> Value {
    let songs: Vec<Value> = songs.iter().map(|s| json!({ "name": s })).collect();
    json!({
        "id": id,
        "versionId": format!("v{id}"),
        "eventDate": date,
        "artist": { "mbid": "mbid-1", "name": "Test Band" },
        "venue": {
            "id": "venue-1",
            "name": "The Hall",
            "city": {
                "id": "city-1",
                "name": "Springfield",
                "state": "Illinois",
                "stateCode": "IL",
                "country": { "code": "US", "name": "United States" }
            }
        },
        "tour": { "name": "Spring Tour" },
        "sets": { "set": [ { "song": songs } ] },
        "url": format!("https://www.setlist.fm/setlist/{id}.html")
    })
}

pub fn page_json(page: u32, total: u32, items_per_page: u32, setlists: Vec<Value>) -> Value {
    json!({
        "type": "setlists",
        "itemsPerPage": items_per_page,
        "page": page,
        "total": total,
        "setlist": setlists
    })
}

// ---------- typed fixtures ----------

pub fn song(name: &str) -> Song {
    Song {
        name: Some(name.to_string()),
        ..Song::default()
    }
}

pub fn cover(name: &str, original_artist: &str) -> Song {
    Song {
        name: Some(name.to_string()),
        cover: Some(ArtistRef {
            mbid: Some(format!("mbid-{original_artist}")),
            name: Some(original_artist.to_string()),
        }),
        ..Song::default()
    }
}

pub fn set(songs: Vec<Song>) -> Set {
    Set {
        name: None,
        encore: None,
        song: songs,
    }
}

pub fn encore(number: u32, songs: Vec<Song>) -> Set {
    Set {
        name: None,
        encore: Some(number),
        song: songs,
    }
}

pub fn show(id: &str, date: &str, sets: Vec<Set>) -> Setlist {
    Setlist {
        id: Some(id.to_string()),
        event_date: Some(date.to_string()),
        artist: Some(ArtistRef {
            mbid: Some("mbid-1".to_string()),
            name: Some("Test Band".to_string()),
        }),
        venue: Some(Venue {
            name: Some("The Hall".to_string()),
            city: Some(City {
                name: Some("Springfield".to_string()),
                state: Some("Illinois".to_string()),
                state_code: Some("IL".to_string()),
                country: Some(Country {
                    code: Some("US".to_string()),
                    name: Some("United States".to_string()),
                }),
            }),
        }),
        tour: Some(Tour {
            name: Some("Spring Tour".to_string()),
        }),
        sets: Sets { set: sets },
        url: None,
    }
}
