//! Prometheus metrics for the search pipeline.
//!
//! This module provides metrics for:
//! - Tracker searches (requests per term, entries extracted)
//! - Session management (login attempts)
//! - Proper finder (candidates found)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Searches
// =============================================================================

/// Search requests by outcome.
pub static SEARCH_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "manicomio_search_requests_total",
            "Total search page requests",
        ),
        &["outcome"], // "entries", "no_results", "unexpected_page", "empty_body", "transport_error", "parse_error"
    )
    .unwrap()
});

/// Entries kept after ranking, by mode.
pub static ENTRIES_EXTRACTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "manicomio_entries_extracted_total",
            "Total result entries kept after filtering",
        ),
        &["mode"],
    )
    .unwrap()
});

/// Search request duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "manicomio_search_duration_seconds",
            "Duration of a single search page request",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["mode"],
    )
    .unwrap()
});

// =============================================================================
// Session
// =============================================================================

/// Login attempts by result.
pub static LOGIN_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("manicomio_login_attempts_total", "Total login attempts"),
        &["result"], // "success", "rejected", "transport_error"
    )
    .unwrap()
});

/// Sessions dropped after repeated unexpected pages.
pub static SESSION_INVALIDATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "manicomio_session_invalidations_total",
        "Total sessions invalidated after unexpected pages",
    )
    .unwrap()
});

// =============================================================================
// Propers
// =============================================================================

/// Proper/repack candidates found.
pub static PROPERS_FOUND: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "manicomio_propers_found_total",
        "Total proper or repack candidates found",
    )
    .unwrap()
});

/// All core metrics, for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCH_REQUESTS.clone()),
        Box::new(ENTRIES_EXTRACTED.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(LOGIN_ATTEMPTS.clone()),
        Box::new(SESSION_INVALIDATIONS.clone()),
        Box::new(PROPERS_FOUND.clone()),
    ]
}
