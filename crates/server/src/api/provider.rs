//! Provider API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use manicomio_core::{Candidate, ProperCandidate, ProviderStatus, Quality, RawEntry, SearchTerms};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;

/// Default look-back window for proper searches.
const PROPER_SEARCH_DAYS: u64 = 2;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub title: String,
    pub url: String,
    pub quality: Quality,
    pub id: u64,
    pub seeders: u32,
    pub leechers: u32,
}

impl From<RawEntry> for SearchResultItem {
    fn from(entry: RawEntry) -> Self {
        let candidate = Candidate::from(&entry);
        Self {
            title: candidate.title,
            url: candidate.url,
            quality: candidate.quality,
            id: entry.id,
            seeders: entry.seeders,
            leechers: entry.leechers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub terms: SearchTerms,
    pub results: Vec<SearchResultItem>,
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct PropersQuery {
    /// First airdate to re-check (default: two days ago).
    pub since: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ProperItem {
    pub title: String,
    pub url: String,
    pub quality: Quality,
    pub show_id: i64,
    pub show_name: String,
    pub discovered_at: DateTime<Utc>,
}

impl From<ProperCandidate> for ProperItem {
    fn from(proper: ProperCandidate) -> Self {
        Self {
            title: proper.candidate.title,
            url: proper.candidate.url,
            quality: proper.candidate.quality,
            show_id: proper.show.id,
            show_name: proper.show.name.clone(),
            discovered_at: proper.discovered_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropersResponse {
    pub since: NaiveDate,
    pub propers: Vec<ProperItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/search
///
/// Run the given terms against the tracker. Results are ranked by seeders
/// within each mode, modes in season, episode, rss order.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(terms): Json<SearchTerms>,
) -> Result<Json<SearchResponse>, impl IntoResponse> {
    let provider = state.provider();
    if let Err(e) = provider.check_auth() {
        return Err(error(StatusCode::PRECONDITION_FAILED, e.to_string()));
    }

    let start = std::time::Instant::now();
    let entries = provider.search(&terms).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    info!(
        provider = provider.name(),
        results = entries.len(),
        duration_ms = duration_ms,
        "Search executed"
    );

    Ok(Json(SearchResponse {
        terms,
        results: entries.into_iter().map(SearchResultItem::from).collect(),
        duration_ms,
    }))
}

/// GET /api/v1/provider/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ProviderStatus> {
    Json(state.provider().status().await)
}

/// GET /api/v1/propers?since=YYYY-MM-DD
///
/// Look for PROPER/REPACK releases of episodes aired since the given date.
pub async fn find_propers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropersQuery>,
) -> Result<Json<PropersResponse>, impl IntoResponse> {
    let Some(finder) = state.propers() else {
        return Err(error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Media library not available",
        ));
    };

    let provider = state.provider();
    if let Err(e) = provider.check_auth() {
        return Err(error(StatusCode::PRECONDITION_FAILED, e.to_string()));
    }

    let today = Utc::now().date_naive();
    let since = query
        .since
        .unwrap_or_else(|| today.checked_sub_days(Days::new(PROPER_SEARCH_DAYS)).unwrap_or(today));

    let propers = finder.find_propers(provider, since).await;

    Ok(Json(PropersResponse {
        since,
        propers: propers.into_iter().map(ProperItem::from).collect(),
    }))
}

/// GET /api/v1/rss
///
/// Latest RSS scan, refreshed when the cached one is older than the
/// configured interval.
pub async fn get_rss(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.rss().refresh().await)
}
