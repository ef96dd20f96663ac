use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    Res,
    error::ScrapeError,
    types::{SONG_ROW_COLUMNS, SongRow},
    utils,
};

/// The CSV file holding all song rows of one artist.
pub struct SetlistFileManager {
    path: PathBuf,
}

impl SetlistFileManager {
    /// Points at `<output_dir>/<artist_slug>_setlists.csv`.
    pub fn new(output_dir: &Path, artist_name: &str) -> Self {
        Self {
            path: utils::setlist_csv_path(output_dir, artist_name),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file with `rows`. Either all rows are written or the
    /// previous file (if any) is left untouched.
    pub fn save(&self, rows: &[SongRow]) -> Res<()> {
        write_song_rows(&self.path, rows)
    }

    pub fn load(&self) -> Res<Vec<SongRow>> {
        read_song_rows(&self.path)
    }
}

/// Writes the header and `rows` to a temp file next to `path`, then renames it
/// over `path`. The destination directory must exist.
///
/// # Arguments
///
/// * `path` - Destination CSV file, replaced if it exists
/// * `rows` - Rows in the order they should appear
///
/// # Returns
///
/// `Ok(())` once the new file is in place. Either every row is written or the
/// previous file stays as it was.
///
/// # Errors
///
/// - [`ScrapeError::Io`] when the directory is missing or not writable, or the
///   rename fails
/// - [`ScrapeError::Csv`] when a row cannot be serialized
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use setlistcli::management::write_song_rows;
///
/// write_song_rows(Path::new("data/raw/phish_setlists.csv"), &[])?;
/// # Ok::<(), setlistcli::error::ScrapeError>(())
/// ```
pub fn write_song_rows(path: &Path, rows: &[SongRow]) -> Res<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|e| ScrapeError::io(dir, e))?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(tmp.as_file()));

        writer.write_record(SONG_ROW_COLUMNS)?;
        for row in rows {
            writer.serialize(row)?;
        }

        let mut inner = writer
            .into_inner()
            .map_err(|e| ScrapeError::io(tmp.path(), e.into_error()))?;
        inner.flush().map_err(|e| ScrapeError::io(tmp.path(), e))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| ScrapeError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| ScrapeError::io(path, e.error))?;

    Ok(())
}

/// Reads a file produced by [`write_song_rows`].
pub fn read_song_rows(path: &Path) -> Res<Vec<SongRow>> {
    let file = File::open(path).map_err(|e| ScrapeError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(SONG_ROW_COLUMNS.iter().copied()) {
        return Err(ScrapeError::InvalidInput(format!(
            "{} does not have the expected setlist columns",
            path.display()
        )));
    }

    reader
        .deserialize::<SongRow>()
        .map(|row| row.map_err(ScrapeError::from))
        .collect()
}
