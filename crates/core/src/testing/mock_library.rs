//! In-memory media library for testing.

use std::sync::RwLock;

use chrono::NaiveDate;

use crate::library::{Episode, Library, LibraryError, RecentEpisode, Show};

/// Mock implementation of the Library trait.
///
/// Recent episodes are returned as added, filtered by airdate. A configured
/// failure makes every query return a database error; a per-show failure
/// only breaks lookups of that show.
#[derive(Debug, Default)]
pub struct MockLibrary {
    shows: RwLock<Vec<Show>>,
    episodes: RwLock<Vec<Episode>>,
    recent: RwLock<Vec<RecentEpisode>>,
    failure: RwLock<Option<String>>,
    show_failures: RwLock<Vec<(i64, String)>>,
}

impl MockLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_show(&self, show: Show) {
        if let Ok(mut shows) = self.shows.write() {
            shows.push(show);
        }
    }

    pub fn add_episode(&self, episode: Episode) {
        if let Ok(mut episodes) = self.episodes.write() {
            episodes.push(episode);
        }
    }

    pub fn add_recent(&self, recent: RecentEpisode) {
        if let Ok(mut rows) = self.recent.write() {
            rows.push(recent);
        }
    }

    /// Make every subsequent query fail.
    pub fn fail_with(&self, message: &str) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(message.to_string());
        }
    }

    /// Make lookups of one show fail.
    pub fn fail_show(&self, show_id: i64, message: &str) {
        if let Ok(mut failures) = self.show_failures.write() {
            failures.push((show_id, message.to_string()));
        }
    }

    fn check_show(&self, show_id: i64) -> Result<(), LibraryError> {
        let failures = self
            .show_failures
            .read()
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        match failures.iter().find(|(id, _)| *id == show_id) {
            Some((_, message)) => Err(LibraryError::Database(message.clone())),
            None => Ok(()),
        }
    }

    fn check(&self) -> Result<(), LibraryError> {
        let failure = self
            .failure
            .read()
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        match failure.as_ref() {
            Some(message) => Err(LibraryError::Database(message.clone())),
            None => Ok(()),
        }
    }
}

impl Library for MockLibrary {
    fn recent_episodes(&self, since: NaiveDate) -> Result<Vec<RecentEpisode>, LibraryError> {
        self.check()?;
        let rows = self
            .recent
            .read()
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(rows
            .iter()
            .filter(|r| r.airdate.is_some_and(|d| d >= since))
            .cloned()
            .collect())
    }

    fn find_show(&self, show_id: i64) -> Result<Option<Show>, LibraryError> {
        self.check()?;
        self.check_show(show_id)?;
        let shows = self
            .shows
            .read()
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(shows.iter().find(|s| s.id == show_id).cloned())
    }

    fn find_episode(
        &self,
        show: &Show,
        season: u32,
        episode: u32,
    ) -> Result<Option<Episode>, LibraryError> {
        self.check()?;
        self.check_show(show.id)?;
        let episodes = self
            .episodes
            .read()
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(episodes
            .iter()
            .find(|e| e.show_id == show.id && e.season == season && e.episode == episode)
            .cloned())
    }
}
