//! Tracker endpoints.

use reqwest::Url;

use super::ProviderError;

/// Categories searched on every query (TV shows, series packs, anime).
pub const SEARCH_CATEGORIES: &str = "&c123=1&c164=1&c163=1&c124=1&c181=1&c125=1&c122=1&c76=1";

/// Endpoint builder for one tracker instance.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Parse the configured base URL.
    pub fn parse(base_url: &str) -> Result<Self, ProviderError> {
        Url::parse(base_url)
            .map(Self::new)
            .map_err(|e| ProviderError::Internal(format!("Invalid base URL '{}': {}", base_url, e)))
    }

    fn root(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Base URL, used as the cookie scope.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Login form endpoint (the tracker's front page).
    pub fn login(&self) -> Url {
        self.base.clone()
    }

    /// Search endpoint for an already normalized term.
    pub fn search(&self, term: &str) -> String {
        format!(
            "{}/pesquisa.php?busca={}&order=desc&sort=seeders&options=0{}",
            self.root(),
            encode_term(term),
            SEARCH_CATEGORIES
        )
    }

    /// Resolve a possibly relative link found on a tracker page.
    pub fn resolve(&self, href: &str) -> String {
        self.base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}

/// The search form rejects raw spaces; they travel as `+`.
pub fn encode_term(term: &str) -> String {
    urlencoding::encode(term).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> SiteUrls {
        SiteUrls::new(Url::parse("http://tracker.example").unwrap())
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            urls().search("Show X S02E05"),
            "http://tracker.example/pesquisa.php?busca=Show+X+S02E05&order=desc&sort=seeders&options=0\
             &c123=1&c164=1&c163=1&c124=1&c181=1&c125=1&c122=1&c76=1"
        );
    }

    #[test]
    fn test_encode_term_escapes_pipes() {
        assert_eq!(
            encode_term("Show X S02E05 PROPER|REPACK"),
            "Show+X+S02E05+PROPER%7CREPACK"
        );
        assert_eq!(encode_term("Show X S02E05 "), "Show+X+S02E05+");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(
            urls().resolve("download.php?id=5"),
            "http://tracker.example/download.php?id=5"
        );
        assert_eq!(
            urls().resolve("http://cdn.example/file.torrent"),
            "http://cdn.example/file.torrent"
        );
    }

    #[test]
    fn test_login_is_base() {
        assert_eq!(urls().login().as_str(), "http://tracker.example/");
    }
}
