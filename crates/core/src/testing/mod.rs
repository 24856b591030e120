//! Testing utilities and mock implementations.
//!
//! Mocks for the provider and library traits, so the proper finder, RSS
//! cache and HTTP handlers can be tested without a tracker or a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use manicomio_core::testing::{MockLibrary, MockProvider};
//!
//! let provider = MockProvider::new();
//! let library = MockLibrary::new();
//!
//! // Configure mock responses
//! provider.set_results(vec![/* entries */]).await;
//! library.add_show(fixtures::show(1, "Show X"));
//! ```

mod mock_library;
mod mock_provider;

pub use mock_library::MockLibrary;
pub use mock_provider::{MockProvider, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::library::{Episode, EpisodeStatus, RecentEpisode, Show, ShowKind};
    use crate::provider::RawEntry;

    /// A standard-numbered show without aliases.
    pub fn show(id: i64, name: &str) -> Show {
        Show {
            id,
            name: name.to_string(),
            kind: ShowKind::Standard,
            aliases: Vec::new(),
        }
    }

    /// An episode whose scene numbering matches the indexer's.
    pub fn episode(show_id: i64, season: u32, number: u32, airdate: NaiveDate) -> Episode {
        Episode {
            show_id,
            season,
            episode: number,
            scene_season: season,
            scene_episode: number,
            absolute_number: None,
            scene_absolute_number: None,
            airdate: Some(airdate),
        }
    }

    /// A downloaded episode row as returned by `recent_episodes`.
    pub fn recent(show: &Show, season: u32, number: u32, airdate: NaiveDate) -> RecentEpisode {
        RecentEpisode {
            show_name: show.name.clone(),
            show_id: show.id,
            season,
            episode: number,
            status: EpisodeStatus::Downloaded,
            airdate: Some(airdate),
        }
    }

    /// A result entry with a download URL derived from its id.
    pub fn entry(title: &str, id: u64, seeders: u32, leechers: u32) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            download_url: format!("http://tracker.test/download.php?id={}", id),
            id,
            seeders,
            leechers,
        }
    }
}
