//! Mock tracker provider for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::provider::{ProviderError, ProviderStatus, RawEntry, SearchTerms, TorrentProvider};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    pub terms: SearchTerms,
    pub timestamp: DateTime<Utc>,
}

/// Mock implementation of the TorrentProvider trait.
///
/// Every search returns the configured entries, whatever the terms, and
/// is recorded for later assertions.
///
/// # Example
///
/// ```rust,ignore
/// use manicomio_core::testing::MockProvider;
///
/// let provider = MockProvider::new();
/// provider.set_results(vec![/* entries */]).await;
///
/// let entries = provider.search(&terms).await;
///
/// let searches = provider.recorded_searches().await;
/// assert_eq!(searches.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockProvider {
    results: Arc<RwLock<Vec<RawEntry>>>,
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    auth_configured: AtomicBool,
    enabled: AtomicBool,
    ratio: Option<f64>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a mock provider with empty results and valid credentials.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            auth_configured: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            ratio: None,
        }
    }

    /// Create a mock provider reporting a seed ratio.
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            ratio: Some(ratio),
            ..Self::new()
        }
    }

    /// Entries returned by every subsequent search.
    pub async fn set_results(&self, results: Vec<RawEntry>) {
        *self.results.write().await = results;
    }

    /// Toggle whether `check_auth` succeeds.
    pub fn set_auth_configured(&self, configured: bool) {
        self.auth_configured.store(configured, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// All searches made so far.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    pub async fn clear_searches(&self) {
        self.searches.write().await.clear();
    }
}

#[async_trait]
impl TorrentProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn check_auth(&self) -> Result<(), ProviderError> {
        if self.auth_configured.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProviderError::AuthConfiguration("mock".to_string()))
        }
    }

    fn seed_ratio(&self) -> Option<f64> {
        self.ratio
    }

    async fn search(&self, terms: &SearchTerms) -> Vec<RawEntry> {
        self.searches.write().await.push(RecordedSearch {
            terms: terms.clone(),
            timestamp: Utc::now(),
        });

        if !self.enabled.load(Ordering::SeqCst) {
            return Vec::new();
        }
        self.results.read().await.clone()
    }

    async fn status(&self) -> ProviderStatus {
        let last_search = self.searches.read().await.last().map(|s| s.timestamp);
        ProviderStatus {
            name: "mock".to_string(),
            enabled: self.enabled.load(Ordering::SeqCst),
            authenticated: self.auth_configured.load(Ordering::SeqCst),
            last_search,
            last_error: None,
            seed_ratio: self.ratio,
        }
    }
}
