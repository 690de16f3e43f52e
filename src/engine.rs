//! The engine is the surface handed to the presentation layer. Every operation opens one
//! read-only store for the duration of the call; the connection is closed when the call returns,
//! whether it succeeded or not.

use tracing::{debug, info};

use crate::batch::{self, BatchOutcome};
use crate::catalog;
use crate::config::Config;
use crate::error::Result;
use crate::library::{self, DatedSong, LibraryStats, TitleLink, TitleSearch};
use crate::lyrics::{self, LyricMatch};
use crate::people::{self, PeopleSearch};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn store(&self) -> Result<Store> {
        Store::open(&self.config)
    }

    /// Answer every catalog question. Only an unreachable store fails the whole call.
    pub fn run_analytics_batch(&self) -> Result<Vec<BatchOutcome>> {
        let store = self.store()?;
        let definitions = catalog::definitions();
        let outcomes = if self.config.parallel_batch {
            // The request-scoped store above doubles as the availability check for the workers.
            drop(store);
            batch::run_parallel(&self.config, definitions)?
        } else {
            batch::run_sequential(&store, definitions)
        };
        batch::summarize(&outcomes);
        Ok(outcomes)
    }

    pub fn search_albums_and_songs(&self, term: &str) -> Result<TitleSearch> {
        let store = self.store()?;
        library::search_albums_and_songs(&store, term)
    }

    pub fn search_people(&self, term: &str) -> Result<PeopleSearch> {
        let store = self.store()?;
        let results = people::search_people(&store, term);
        for e in results.errors() {
            info!("{}", e);
        }
        Ok(results)
    }

    pub fn search_lyrics(&self, term: &str) -> Result<Vec<LyricMatch>> {
        let store = self.store()?;
        lyrics::search_lyrics(&store, term)
    }

    pub fn list_albums(&self) -> Result<Vec<TitleLink>> {
        let store = self.store()?;
        library::list_albums(&store, &self.config.no_album_title)
    }

    pub fn list_songs(&self) -> Result<Vec<DatedSong>> {
        let store = self.store()?;
        library::list_songs(&store)
    }

    pub fn library_stats(&self) -> Result<LibraryStats> {
        let store = self.store()?;
        let stats = library::library_stats(&store)?;
        debug!("Library stats: {:?}", stats);
        Ok(stats)
    }
}
