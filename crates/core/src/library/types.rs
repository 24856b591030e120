//! Show and episode types read from the media library.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a show numbers its episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowKind {
    /// Season/episode numbering (S01E01).
    Standard,
    /// Episodes identified by air date (daily shows).
    AirByDate,
    /// Sports events, identified by air date.
    Sports,
    /// Absolute episode numbering.
    Anime,
}

/// A show known to the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Indexer id of the show.
    pub id: i64,
    /// Primary display name.
    pub name: String,
    pub kind: ShowKind,
    /// Alternative names the show is released under (scene exceptions).
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Show {
    /// Every distinct name the show may be released under, primary name first.
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.aliases.len() + 1);
        for name in std::iter::once(&self.name).chain(self.aliases.iter()) {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub show_id: i64,
    pub season: u32,
    pub episode: u32,
    /// Numbering used by release groups, which may differ from the indexer's.
    pub scene_season: u32,
    pub scene_episode: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_absolute_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airdate: Option<NaiveDate>,
}

/// Base episode status stored in the lower two digits of the composite status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Unaired,
    Snatched,
    Wanted,
    Downloaded,
    Skipped,
    Archived,
    Ignored,
    SnatchedProper,
    Subtitled,
    Failed,
    SnatchedBest,
    Unknown,
}

impl EpisodeStatus {
    /// Numeric code of the base status.
    pub fn code(&self) -> i64 {
        match self {
            EpisodeStatus::Unknown => -1,
            EpisodeStatus::Unaired => 1,
            EpisodeStatus::Snatched => 2,
            EpisodeStatus::Wanted => 3,
            EpisodeStatus::Downloaded => 4,
            EpisodeStatus::Skipped => 5,
            EpisodeStatus::Archived => 6,
            EpisodeStatus::Ignored => 7,
            EpisodeStatus::SnatchedProper => 9,
            EpisodeStatus::Subtitled => 10,
            EpisodeStatus::Failed => 11,
            EpisodeStatus::SnatchedBest => 12,
        }
    }

    /// Decode a composite (`quality * 100 + status`) value.
    pub fn from_composite(composite: i64) -> Self {
        match composite % 100 {
            1 => EpisodeStatus::Unaired,
            2 => EpisodeStatus::Snatched,
            3 => EpisodeStatus::Wanted,
            4 => EpisodeStatus::Downloaded,
            5 => EpisodeStatus::Skipped,
            6 => EpisodeStatus::Archived,
            7 => EpisodeStatus::Ignored,
            9 => EpisodeStatus::SnatchedProper,
            10 => EpisodeStatus::Subtitled,
            11 => EpisodeStatus::Failed,
            12 => EpisodeStatus::SnatchedBest,
            _ => EpisodeStatus::Unknown,
        }
    }
}

/// A recently aired episode row joined with its show name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentEpisode {
    pub show_name: String,
    pub show_id: i64,
    pub season: u32,
    pub episode: u32,
    pub status: EpisodeStatus,
    pub airdate: Option<NaiveDate>,
}

/// Errors raised by library queries.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),
}
