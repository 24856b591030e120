//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that builds the router in-process
//! with a mock provider and an in-memory library, so handlers can be
//! exercised without a tracker or a media database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use manicomio_core::{
    testing::{MockLibrary, MockProvider},
    Config, LibraryConfig, ProperFinder, ProviderConfig, RssCache, ServerConfig,
};

/// Re-export fixtures for test convenience
pub use manicomio_core::testing::fixtures;

/// Test fixture with a mock provider and library behind the real router.
pub struct TestFixture {
    pub router: Router,
    pub provider: Arc<MockProvider>,
    pub library: Arc<MockLibrary>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Whether a media library is available
    pub with_library: bool,
    pub rss_terms: Vec<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_library: true,
            rss_terms: vec!["720p".to_string()],
        }
    }
}

impl TestConfig {
    pub fn without_library() -> Self {
        Self {
            with_library: false,
            ..Self::default()
        }
    }
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let provider = Arc::new(MockProvider::with_ratio(1.5));
        let library = Arc::new(MockLibrary::new());

        let config = Config {
            provider: ProviderConfig {
                username: Some("user".to_string()),
                password: Some("secret".to_string()),
                rss_terms: test_config.rss_terms.clone(),
                ..ProviderConfig::default()
            },
            library: LibraryConfig::default(),
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
        };

        let propers = test_config
            .with_library
            .then(|| ProperFinder::new(Arc::clone(&library) as Arc<dyn manicomio_core::Library>));

        let rss = RssCache::new(
            Arc::clone(&provider) as Arc<dyn manicomio_core::TorrentProvider>,
            test_config.rss_terms,
            Duration::minutes(20),
        );

        let state = Arc::new(manicomio_server::state::AppState::new(
            config,
            "0123456789abcdef".to_string(),
            Arc::clone(&provider) as Arc<dyn manicomio_core::TorrentProvider>,
            propers,
            rss,
        ));

        let router = manicomio_server::api::create_router(state);

        Self {
            router,
            provider,
            library,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}
