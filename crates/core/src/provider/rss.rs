//! Rate-limited RSS scan.
//!
//! The tracker has no feed; a "recent releases" view is emulated by
//! searching a fixed term list in RSS mode, where no thresholds apply.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::ProviderConfig;

use super::{Candidate, SearchMode, SearchTerms, TorrentProvider};

/// Result of the last RSS scan.
#[derive(Debug, Clone, Serialize)]
pub struct RssSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub candidates: Vec<Candidate>,
}

pub struct RssCache {
    provider: Arc<dyn TorrentProvider>,
    terms: Vec<String>,
    min_interval: Duration,
    last: Mutex<Option<RssSnapshot>>,
}

impl RssCache {
    pub fn new(provider: Arc<dyn TorrentProvider>, terms: Vec<String>, min_interval: Duration) -> Self {
        Self {
            provider,
            terms,
            min_interval,
            last: Mutex::new(None),
        }
    }

    pub fn from_config(provider: Arc<dyn TorrentProvider>, config: &ProviderConfig) -> Self {
        Self::new(
            provider,
            config.rss_terms.clone(),
            Duration::minutes(i64::from(config.rss_min_interval_mins)),
        )
    }

    /// Last snapshot, without touching the network.
    pub async fn cached(&self) -> Option<RssSnapshot> {
        self.last.lock().await.clone()
    }

    /// Rescan when the last scan is older than the minimum interval,
    /// otherwise return the cached snapshot. Concurrent callers wait for
    /// the scan in progress.
    pub async fn refresh(&self) -> RssSnapshot {
        let mut last = self.last.lock().await;

        if let Some(snapshot) = last.as_ref() {
            if Utc::now() - snapshot.fetched_at < self.min_interval {
                debug!(
                    provider = self.provider.name(),
                    fetched_at = %snapshot.fetched_at,
                    "RSS cache is fresh"
                );
                return snapshot.clone();
            }
        }

        if let Err(e) = self.provider.check_auth() {
            warn!(provider = self.provider.name(), error = %e, "Skipping RSS refresh");
            return last.clone().unwrap_or_else(|| RssSnapshot {
                fetched_at: Utc::now(),
                candidates: Vec::new(),
            });
        }

        let candidates = if self.terms.is_empty() {
            Vec::new()
        } else {
            let terms = SearchTerms::for_mode(SearchMode::Rss, self.terms.clone());
            self.provider.search_candidates(&terms).await
        };

        debug!(
            provider = self.provider.name(),
            candidates = candidates.len(),
            "RSS cache refreshed"
        );

        let snapshot = RssSnapshot {
            fetched_at: Utc::now(),
            candidates,
        };
        *last = Some(snapshot.clone());
        snapshot
    }
}
