use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Media library (read-only SQLite) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    #[serde(default = "default_library_path")]
    pub path: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
        }
    }
}

fn default_library_path() -> PathBuf {
    PathBuf::from("sickbeard.db")
}

/// Manicomio Share provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Whether the provider takes part in searches (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Tracker base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Tracker account name
    #[serde(default)]
    pub username: Option<String>,
    /// Tracker account password
    #[serde(default)]
    pub password: Option<String>,
    /// Minimum seeders for a result outside RSS mode (default: 0)
    #[serde(default)]
    pub min_seed: u32,
    /// Minimum leechers for a result outside RSS mode (default: 0)
    #[serde(default)]
    pub min_leech: u32,
    /// Seed ratio reported to download clients
    #[serde(default)]
    pub ratio: Option<f64>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Verify TLS certificates (default: false, the tracker uses a self-signed one)
    #[serde(default)]
    pub verify_tls: bool,
    /// Minimum minutes between two RSS refreshes (default: 20)
    #[serde(default = "default_rss_min_interval")]
    pub rss_min_interval_mins: u32,
    /// Terms searched on every RSS refresh
    #[serde(default)]
    pub rss_terms: Vec<String>,
    /// Drop the session after this many consecutive unexpected pages.
    /// Unset keeps trusting existing cookies forever.
    #[serde(default)]
    pub relogin_after_unexpected_pages: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            username: None,
            password: None,
            min_seed: 0,
            min_leech: 0,
            ratio: None,
            timeout_secs: default_timeout(),
            verify_tls: false,
            rss_min_interval_mins: default_rss_min_interval(),
            rss_terms: Vec::new(),
            relogin_after_unexpected_pages: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "http://www.manicomio-share.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_rss_min_interval() -> u32 {
    20
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub provider: SanitizedProviderConfig,
    pub library: LibraryConfig,
    pub server: ServerConfig,
}

/// Sanitized provider config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProviderConfig {
    pub enabled: bool,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password_configured: bool,
    pub min_seed: u32,
    pub min_leech: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    pub timeout_secs: u32,
    pub verify_tls: bool,
    pub rss_min_interval_mins: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relogin_after_unexpected_pages: Option<u32>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let p = &config.provider;
        Self {
            provider: SanitizedProviderConfig {
                enabled: p.enabled,
                base_url: p.base_url.clone(),
                username: p.username.clone(),
                password_configured: p.password.as_deref().is_some_and(|s| !s.is_empty()),
                min_seed: p.min_seed,
                min_leech: p.min_leech,
                ratio: p.ratio,
                timeout_secs: p.timeout_secs,
                verify_tls: p.verify_tls,
                rss_min_interval_mins: p.rss_min_interval_mins,
                relogin_after_unexpected_pages: p.relogin_after_unexpected_pages,
            },
            library: config.library.clone(),
            server: config.server.clone(),
        }
    }
}
