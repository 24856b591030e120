use std::sync::Arc;

use manicomio_core::{Config, ProperFinder, RssCache, SanitizedConfig, TorrentProvider};

/// Shared application state
pub struct AppState {
    config: Config,
    config_hash: String,
    provider: Arc<dyn TorrentProvider>,
    propers: Option<ProperFinder>,
    rss: RssCache,
}

impl AppState {
    pub fn new(
        config: Config,
        config_hash: String,
        provider: Arc<dyn TorrentProvider>,
        propers: Option<ProperFinder>,
        rss: RssCache,
    ) -> Self {
        Self {
            config,
            config_hash,
            provider,
            propers,
            rss,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Short fingerprint of the loaded configuration.
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn provider(&self) -> &dyn TorrentProvider {
        self.provider.as_ref()
    }

    /// Proper finder, present when the media library could be opened.
    pub fn propers(&self) -> Option<&ProperFinder> {
        self.propers.as_ref()
    }

    pub fn rss(&self) -> &RssCache {
        &self.rss
    }
}
