//! Read-only view of the media library (shows and episodes).
//!
//! The library database is owned by the media manager; this module only
//! queries it to find episodes worth re-checking for proper releases.

mod sqlite;
mod types;

pub use sqlite::{SqliteLibrary, LIBRARY_SCHEMA};
pub use types::*;

use chrono::NaiveDate;

/// Trait for media library lookups.
pub trait Library: Send + Sync {
    /// Episodes aired on or after `since` that are downloaded or snatched.
    fn recent_episodes(&self, since: NaiveDate) -> Result<Vec<RecentEpisode>, LibraryError>;

    /// Look up a show by indexer id.
    fn find_show(&self, show_id: i64) -> Result<Option<Show>, LibraryError>;

    /// Look up an episode of a show by season and episode number.
    fn find_episode(
        &self,
        show: &Show,
        season: u32,
        episode: u32,
    ) -> Result<Option<Episode>, LibraryError>;
}
