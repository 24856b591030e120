//! Types for the tracker search pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::library::{LibraryError, Show};
use crate::quality::Quality;

use super::extractor::PageParseError;

/// Search bucket. Iteration order is significant: results are concatenated
/// Season, then Episode, then RSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Whole-season releases.
    Season,
    /// Single episode releases.
    Episode,
    /// Passive feed scan; results are never threshold-filtered.
    Rss,
}

impl SearchMode {
    /// All modes in result order.
    pub const ALL: [SearchMode; 3] = [SearchMode::Season, SearchMode::Episode, SearchMode::Rss];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Season => "season",
            SearchMode::Episode => "episode",
            SearchMode::Rss => "rss",
        }
    }

    /// Passive modes skip the seed/leech thresholds.
    pub fn is_passive(&self) -> bool {
        matches!(self, SearchMode::Rss)
    }
}

/// Search terms keyed by mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerms {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub season: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub episode: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rss: Vec<String>,
}

impl SearchTerms {
    /// Terms for a single mode.
    pub fn for_mode(mode: SearchMode, terms: Vec<String>) -> Self {
        let mut search_terms = Self::default();
        *search_terms.get_mut(mode) = terms;
        search_terms
    }

    pub fn get(&self, mode: SearchMode) -> &[String] {
        match mode {
            SearchMode::Season => &self.season,
            SearchMode::Episode => &self.episode,
            SearchMode::Rss => &self.rss,
        }
    }

    pub fn get_mut(&mut self, mode: SearchMode) -> &mut Vec<String> {
        match mode {
            SearchMode::Season => &mut self.season,
            SearchMode::Episode => &mut self.episode,
            SearchMode::Rss => &mut self.rss,
        }
    }

    pub fn push(&mut self, mode: SearchMode, term: impl Into<String>) {
        self.get_mut(mode).push(term.into());
    }

    /// True when no mode carries a term.
    pub fn is_empty(&self) -> bool {
        SearchMode::ALL.iter().all(|m| self.get(*m).is_empty())
    }
}

/// One result row as extracted from the tracker's HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    pub download_url: String,
    /// Tracker torrent id.
    pub id: u64,
    pub seeders: u32,
    pub leechers: u32,
}

/// A normalized, ready-to-present download result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Release title with spaces replaced by dots.
    pub title: String,
    /// Download URL with `&amp;` decoded.
    pub url: String,
    /// Scene quality guessed from the title (informational).
    pub quality: Quality,
}

impl From<&RawEntry> for Candidate {
    fn from(entry: &RawEntry) -> Self {
        let title = entry.title.replace(' ', ".");
        Self {
            quality: Quality::from_scene_name(&title),
            url: entry.download_url.replace("&amp;", "&"),
            title,
        }
    }
}

/// A candidate found while re-checking an already obtained episode.
#[derive(Debug, Clone)]
pub struct ProperCandidate {
    pub candidate: Candidate,
    /// When the release was found, not when the episode aired.
    pub discovered_at: DateTime<Utc>,
    pub show: Arc<Show>,
}

/// Snapshot of the provider's health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub enabled: bool,
    /// Whether the session currently holds tracker cookies.
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_search: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_ratio: Option<f64>,
}

/// Errors that can occur in the search pipeline.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Your authentication credentials for {0} are missing, check your config")]
    AuthConfiguration(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to parse page: {0}")]
    Parse(#[from] PageParseError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Classify a transport-level failure.
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::ConnectionFailed(e.to_string())
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}

/// Trait for tracker search providers.
#[async_trait]
pub trait TorrentProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fail fast when the provider cannot possibly log in.
    fn check_auth(&self) -> Result<(), ProviderError>;

    /// Seed ratio to hand to download clients, if configured.
    fn seed_ratio(&self) -> Option<f64>;

    /// Run every term and return ranked entries, Season bucket first.
    ///
    /// Never fails: transport, login and parsing problems are logged and
    /// contribute zero results.
    async fn search(&self, terms: &SearchTerms) -> Vec<RawEntry>;

    /// Current health of the provider.
    async fn status(&self) -> ProviderStatus;

    /// Same as [`TorrentProvider::search`], normalized into candidates.
    async fn search_candidates(&self, terms: &SearchTerms) -> Vec<Candidate> {
        self.search(terms).await.iter().map(Candidate::from).collect()
    }
}
