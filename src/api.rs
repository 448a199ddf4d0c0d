//! HTTP API endpoints.
//!
//! Read-only views used by the admin panel and the public leaderboard screen.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::admin::DashboardStats;
use crate::state::AppState;
use crate::types::LeaderboardEntry;

/// Whether question translation is usable right now
#[derive(Debug, Clone, Serialize)]
pub struct TranslationStatus {
    pub available: bool,
    pub provider: Option<String>,
    pub in_flight: bool,
}

/// GET /api/translation/status
pub async fn translation_status(State(state): State<Arc<AppState>>) -> Json<TranslationStatus> {
    let service = &state.translation;
    Json(TranslationStatus {
        available: service.is_available(),
        provider: service.provider_name().map(str::to_string),
        in_flight: service.in_flight(),
    })
}

/// GET /api/leaderboard
pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.leaderboard().await)
}

/// Dashboard counters and per-currency totals.
///
/// GET /api/dashboard (behind admin auth)
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    Json(state.dashboard().await)
}
