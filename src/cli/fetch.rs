use std::io;

use crate::{
    config::Config,
    error, pipeline,
    setlistfm::{BestMatchSelector, CandidateSelector, PromptSelector, SetlistClient},
    success, warning,
};

/// Runs the whole scrape for `artist` and reports the outcome.
///
/// With `first` set, ambiguous searches are settled by [`BestMatchSelector`];
/// otherwise the user is asked on the terminal. Fatal errors terminate the
/// process through `error!`.
pub fn fetch(config: &Config, artist: &str, first: bool) {
    if let Err(e) = std::fs::create_dir_all(&config.output_dir) {
        error!(
            "Cannot create output directory {}: {}",
            config.output_dir.display(),
            e
        );
    }

    let client = match SetlistClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot set up setlist.fm client: {}", e),
    };

    let stdin = io::stdin();
    let mut selector: Box<dyn CandidateSelector> = if first {
        Box::new(BestMatchSelector)
    } else {
        Box::new(PromptSelector::new(stdin.lock(), io::stdout()))
    };

    match pipeline::run(&client, config, artist, selector.as_mut()) {
        Ok(summary) => {
            if summary.skipped > 0 {
                warning!("Skipped {} songs without a name", summary.skipped);
            }
            if summary.skipped_shows > 0 {
                warning!("Skipped {} malformed shows", summary.skipped_shows);
            }
            success!(
                "Wrote {} songs from {} shows of {} to {}",
                summary.rows,
                summary.shows,
                summary.artist.name,
                summary.path.display()
            );
        }
        Err(e) => error!("{}", e),
    }
}
