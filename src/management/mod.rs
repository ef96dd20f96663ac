mod setlist_file;

pub use setlist_file::SetlistFileManager;
pub use setlist_file::read_song_rows;
pub use setlist_file::write_song_rows;
