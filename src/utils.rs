use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

use crate::types::SongRow;

pub const OUTPUT_SUFFIX: &str = "_setlists.csv";

/// Turns an artist name into a file-name stem: `"Pearl Jam"` -> `"pearl_jam"`.
pub fn artist_slug(artist_name: &str) -> String {
    artist_name
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("_")
}

pub fn setlist_csv_path(output_dir: &Path, artist_name: &str) -> PathBuf {
    output_dir.join(format!("{}{}", artist_slug(artist_name), OUTPUT_SUFFIX))
}

/// setlist.fm reports dates as `dd-MM-yyyy`; rows carry ISO dates. Unparseable
/// values are passed through untouched.
pub fn normalize_event_date(event_date: &str) -> String {
    match NaiveDate::parse_from_str(event_date, "%d-%m-%Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => event_date.to_string(),
    }
}

pub fn is_festival(venue_name: &str, tour_name: &str) -> bool {
    [venue_name, tour_name]
        .iter()
        .any(|name| name.to_lowercase().contains("festival"))
}

/// Stable sort by show date, oldest first. Rows of one show share a date, so
/// their performance order survives.
pub fn sort_rows_chronologically(rows: &mut [SongRow]) {
    rows.sort_by_key(|row| NaiveDate::parse_from_str(&row.show_date, "%Y-%m-%d").ok());
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
