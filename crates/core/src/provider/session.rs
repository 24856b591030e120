//! Cookie-based tracker session.
//!
//! The tracker has no API; a logged-in browser session is emulated by
//! posting the login form once and replaying the `uid`/`pass` cookies it
//! sets. The cookie pair is cached on the manager so a rebuilt session can
//! be restored without another login round trip.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info};

use crate::config::ProviderConfig;
use crate::metrics::LOGIN_ATTEMPTS;

use super::urls::SiteUrls;
use super::ProviderError;

/// Cookie carrying the tracker user id.
pub const UID_COOKIE: &str = "uid";
/// Cookie carrying the tracker password hash.
pub const PASS_COOKIE: &str = "pass";

/// Text the login page shows when the form post was rejected.
const LOGIN_REJECTED_MARKER: &str = "You need cookies enabled to log in.";

/// Credential pair captured from a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub uid: String,
    pub pass: String,
}

/// Owns the HTTP client, its cookie jar and the cached credentials.
pub struct SessionManager {
    provider_name: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
    verify_tls: bool,
    urls: SiteUrls,
    jar: Arc<Jar>,
    client: Client,
    cached: Option<Credentials>,
    last_error: Option<String>,
}

impl SessionManager {
    /// Create a session manager with an empty cookie jar.
    pub fn new(
        provider_name: &str,
        config: &ProviderConfig,
        urls: SiteUrls,
    ) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(u64::from(config.timeout_secs));
        let jar = Arc::new(Jar::default());
        let client = build_client(&jar, timeout, config.verify_tls)?;

        Ok(Self {
            provider_name: provider_name.to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout,
            verify_tls: config.verify_tls,
            urls,
            jar,
            client,
            cached: None,
            last_error: None,
        })
    }

    /// HTTP client bound to the session's cookie jar.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Credentials cached from the last successful login.
    pub fn cached_credentials(&self) -> Option<&Credentials> {
        self.cached.as_ref()
    }

    /// Last login failure, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fails when username or password is missing. Must be checked by
    /// callers before searching; no network call is made.
    pub fn check_auth(&self) -> Result<(), ProviderError> {
        check_credentials(
            &self.provider_name,
            self.username.as_deref(),
            self.password.as_deref(),
        )
    }

    /// Cookies the jar would send to the tracker, as name/value pairs.
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.jar
            .cookies(self.urls.base())
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .map(|header| {
                header
                    .split(';')
                    .filter_map(|pair| {
                        let (name, value) = pair.trim().split_once('=')?;
                        Some((name.to_string(), value.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when the jar holds any non-empty cookie value.
    pub fn has_cookies(&self) -> bool {
        self.cookies().iter().any(|(_, value)| !value.is_empty())
    }

    /// Make sure requests carry tracker cookies.
    ///
    /// Present cookies are trusted without asking the tracker. Cached
    /// credentials are replayed into an empty jar. Only when neither exists
    /// is the login form posted. Returns false when the login fails; the
    /// failure is logged, the session is rebuilt empty, and callers treat
    /// it as "no results".
    pub async fn ensure_authenticated(&mut self) -> bool {
        if self.has_cookies() {
            return true;
        }

        if let Some(credentials) = self.cached.clone() {
            debug!(provider = %self.provider_name, "Restoring cached session cookies");
            self.inject(&credentials);
            return true;
        }

        match self.login().await {
            Ok(credentials) => {
                LOGIN_ATTEMPTS.with_label_values(&["success"]).inc();
                info!(provider = %self.provider_name, "Logged in");
                self.cached = Some(credentials);
                self.last_error = None;
                true
            }
            Err(e) => {
                match &e {
                    ProviderError::AuthFailed(_) | ProviderError::AuthConfiguration(_) => {
                        LOGIN_ATTEMPTS.with_label_values(&["rejected"]).inc();
                        error!(
                            provider = %self.provider_name,
                            error = %e,
                            "Invalid username or password, check your settings"
                        );
                    }
                    _ => {
                        LOGIN_ATTEMPTS.with_label_values(&["transport_error"]).inc();
                        error!(
                            provider = %self.provider_name,
                            error = %e,
                            "Unable to connect to provider"
                        );
                    }
                }
                self.last_error = Some(e.to_string());
                // A rejected post may still have set cookies
                if let Err(rebuild) = self.invalidate() {
                    error!(
                        provider = %self.provider_name,
                        error = %rebuild,
                        "Failed to rebuild session"
                    );
                }
                false
            }
        }
    }

    /// Drop the cookie jar and cached credentials so the next
    /// [`SessionManager::ensure_authenticated`] posts the login form again.
    pub fn invalidate(&mut self) -> Result<(), ProviderError> {
        let jar = Arc::new(Jar::default());
        self.client = build_client(&jar, self.timeout, self.verify_tls)?;
        self.jar = jar;
        self.cached = None;
        debug!(provider = %self.provider_name, "Session invalidated");
        Ok(())
    }

    fn inject(&self, credentials: &Credentials) {
        let base = self.urls.base();
        self.jar
            .add_cookie_str(&format!("{}={}; Path=/", UID_COOKIE, credentials.uid), base);
        self.jar
            .add_cookie_str(&format!("{}={}; Path=/", PASS_COOKIE, credentials.pass), base);
    }

    /// Post the login form and capture the credential cookies.
    async fn login(&self) -> Result<Credentials, ProviderError> {
        self.check_auth()?;
        let username = self.username.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();

        let params = [
            ("username", username),
            ("password", password),
            ("dados", "ok"),
        ];

        let response = self
            .client
            .post(self.urls.login())
            .form(&params)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ProviderError::from_transport)?;

        if body.contains(LOGIN_REJECTED_MARKER) || status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::AuthFailed(
                "tracker rejected the login form".to_string(),
            ));
        }

        let cookies = self.cookies();
        let find = |name: &str| {
            cookies
                .iter()
                .find(|(n, v)| n == name && !v.is_empty())
                .map(|(_, v)| v.clone())
        };

        match (find(UID_COOKIE), find(PASS_COOKIE)) {
            (Some(uid), Some(pass)) => Ok(Credentials { uid, pass }),
            _ => Err(ProviderError::AuthFailed(format!(
                "login response (HTTP {}) did not set the {} and {} cookies",
                status, UID_COOKIE, PASS_COOKIE
            ))),
        }
    }
}

pub(crate) fn check_credentials(
    provider_name: &str,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(), ProviderError> {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());
    if !present(username) || !present(password) {
        return Err(ProviderError::AuthConfiguration(provider_name.to_string()));
    }
    Ok(())
}

fn build_client(jar: &Arc<Jar>, timeout: Duration, verify_tls: bool) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .cookie_provider(Arc::clone(jar))
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|e| ProviderError::Internal(format!("Failed to create HTTP client: {}", e)))
}
