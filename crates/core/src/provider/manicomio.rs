//! Manicomio Share provider.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::ProviderConfig;
use crate::metrics::{ENTRIES_EXTRACTED, SEARCH_DURATION, SEARCH_REQUESTS, SESSION_INVALIDATIONS};

use super::extractor::{ManicomioParser, PageOutcome, ResultParser};
use super::query::normalize_term;
use super::rank::{filter_and_rank, Thresholds};
use super::session::{check_credentials, SessionManager};
use super::urls::SiteUrls;
use super::{ProviderError, ProviderStatus, RawEntry, SearchMode, SearchTerms, TorrentProvider};

/// Display name used in logs and status.
pub const PROVIDER_NAME: &str = "ManicomioShare";

/// Session plus the run of consecutive unexpected pages seen through it.
struct SessionState {
    manager: SessionManager,
    unexpected_pages: u32,
}

#[derive(Debug, Default)]
struct Activity {
    authenticated: bool,
    last_search: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Tracker search provider.
///
/// Terms are searched one at a time while holding the session lock, so
/// concurrent searches on one instance run back to back.
pub struct ManicomioProvider {
    config: ProviderConfig,
    urls: SiteUrls,
    thresholds: Thresholds,
    parser: Box<dyn ResultParser>,
    session: Mutex<SessionState>,
    activity: RwLock<Activity>,
}

impl ManicomioProvider {
    /// Create a provider with the production page parser.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let parser = ManicomioParser::new()?;
        Self::with_parser(config, Box::new(parser))
    }

    /// Create a provider with a custom page parser.
    pub fn with_parser(
        config: ProviderConfig,
        parser: Box<dyn ResultParser>,
    ) -> Result<Self, ProviderError> {
        let urls = SiteUrls::parse(&config.base_url)?;
        let manager = SessionManager::new(PROVIDER_NAME, &config, urls.clone())?;
        let thresholds = Thresholds {
            min_seed: config.min_seed,
            min_leech: config.min_leech,
        };

        Ok(Self {
            config,
            urls,
            thresholds,
            parser,
            session: Mutex::new(SessionState {
                manager,
                unexpected_pages: 0,
            }),
            activity: RwLock::new(Activity::default()),
        })
    }

    /// Fetch and parse one search page. `Ok(None)` means the term yields
    /// nothing (empty body).
    async fn fetch_page(
        &self,
        client: &Client,
        url: &str,
    ) -> Result<Option<PageOutcome>, ProviderError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(ProviderError::from_transport)?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(self.parser.parse(&body)?))
    }

    /// Run one term and return its raw entries. Every failure is logged
    /// here and contributes nothing.
    async fn search_term(
        &self,
        state: &mut SessionState,
        mode: SearchMode,
        term: &str,
    ) -> Vec<RawEntry> {
        let url = self.urls.search(term);
        debug!(provider = PROVIDER_NAME, mode = mode.as_str(), url = %url, "Search string");

        let start = Instant::now();
        let result = self.fetch_page(state.manager.client(), &url).await;
        SEARCH_DURATION
            .with_label_values(&[mode.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let outcome = match result {
            Ok(Some(outcome)) => outcome,
            Ok(None) => {
                SEARCH_REQUESTS.with_label_values(&["empty_body"]).inc();
                debug!(provider = PROVIDER_NAME, term = term, "Empty response body");
                return Vec::new();
            }
            Err(ProviderError::Parse(e)) => {
                SEARCH_REQUESTS.with_label_values(&["parse_error"]).inc();
                error!(
                    provider = PROVIDER_NAME,
                    term = term,
                    error = ?e,
                    "Failed parsing result page"
                );
                self.activity.write().await.last_error = Some(e.to_string());
                return Vec::new();
            }
            Err(e) => {
                SEARCH_REQUESTS.with_label_values(&["transport_error"]).inc();
                warn!(provider = PROVIDER_NAME, term = term, error = %e, "Search request failed");
                self.activity.write().await.last_error = Some(e.to_string());
                return Vec::new();
            }
        };

        match outcome {
            PageOutcome::NoResults => {
                SEARCH_REQUESTS.with_label_values(&["no_results"]).inc();
                state.unexpected_pages = 0;
                debug!(provider = PROVIDER_NAME, term = term, url = %url, "No results found");
                Vec::new()
            }
            PageOutcome::UnexpectedPage => {
                SEARCH_REQUESTS.with_label_values(&["unexpected_page"]).inc();
                debug!(
                    provider = PROVIDER_NAME,
                    term = term,
                    "The data returned does not contain any torrent"
                );
                self.note_unexpected_page(state);
                Vec::new()
            }
            PageOutcome::Entries(entries) => {
                SEARCH_REQUESTS.with_label_values(&["entries"]).inc();
                state.unexpected_pages = 0;
                entries
                    .into_iter()
                    .map(|mut entry| {
                        debug!(provider = PROVIDER_NAME, title = %entry.title, "Found result");
                        if !entry.download_url.is_empty() {
                            entry.download_url = self.urls.resolve(&entry.download_url);
                        }
                        entry
                    })
                    .collect()
            }
        }
    }

    /// Apply the relogin policy after an unexpected page.
    fn note_unexpected_page(&self, state: &mut SessionState) {
        state.unexpected_pages += 1;

        let Some(limit) = self.config.relogin_after_unexpected_pages else {
            return;
        };
        if limit == 0 || state.unexpected_pages < limit {
            return;
        }

        warn!(
            provider = PROVIDER_NAME,
            pages = state.unexpected_pages,
            "Too many unexpected pages, dropping session"
        );
        state.unexpected_pages = 0;
        match state.manager.invalidate() {
            Ok(()) => SESSION_INVALIDATIONS.inc(),
            Err(e) => error!(provider = PROVIDER_NAME, error = %e, "Failed to rebuild session"),
        }
    }
}

#[async_trait]
impl TorrentProvider for ManicomioProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn check_auth(&self) -> Result<(), ProviderError> {
        check_credentials(
            PROVIDER_NAME,
            self.config.username.as_deref(),
            self.config.password.as_deref(),
        )
    }

    fn seed_ratio(&self) -> Option<f64> {
        self.config.ratio
    }

    async fn search(&self, terms: &SearchTerms) -> Vec<RawEntry> {
        if !self.config.enabled {
            debug!(provider = PROVIDER_NAME, "Provider disabled, skipping search");
            return Vec::new();
        }

        let mut state = self.session.lock().await;
        let mut results = Vec::new();

        'modes: for mode in SearchMode::ALL {
            let mut bucket = Vec::new();

            for term in terms.get(mode) {
                let term = normalize_term(term);
                if term.trim().is_empty() {
                    continue;
                }

                let authenticated = state.manager.ensure_authenticated().await;
                {
                    let mut activity = self.activity.write().await;
                    activity.authenticated = authenticated;
                    if !authenticated {
                        activity.last_error = state.manager.last_error().map(str::to_string);
                    }
                }
                if !authenticated {
                    results.extend(filter_and_rank(bucket, mode, &self.thresholds));
                    break 'modes;
                }

                bucket.extend(self.search_term(&mut state, mode, &term).await);
            }

            let ranked = filter_and_rank(bucket, mode, &self.thresholds);
            ENTRIES_EXTRACTED
                .with_label_values(&[mode.as_str()])
                .inc_by(ranked.len() as u64);
            results.extend(ranked);
        }

        self.activity.write().await.last_search = Some(Utc::now());
        info!(
            provider = PROVIDER_NAME,
            results = results.len(),
            "Search complete"
        );
        results
    }

    async fn status(&self) -> ProviderStatus {
        let activity = self.activity.read().await;
        ProviderStatus {
            name: PROVIDER_NAME.to_string(),
            enabled: self.config.enabled,
            authenticated: activity.authenticated,
            last_search: activity.last_search,
            last_error: activity.last_error.clone(),
            seed_ratio: self.config.ratio,
        }
    }
}
