//! Leaderboard endpoint
//!
//! GET /api/leaderboard?limit=N -> top N entries plus the requester's own row

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::accounts::AccountService;
use crate::api::{account_failure, requester_from_headers};
use crate::config::LeaderboardConfig;
use crate::ranking::{LeaderboardService, RankedEntry};

#[derive(Clone)]
pub struct LeaderboardApiState {
    pub leaderboard: LeaderboardService,
    pub accounts: AccountService,
    pub config: Arc<LeaderboardConfig>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// GET /api/leaderboard
pub async fn get_leaderboard(
    State(state): State<LeaderboardApiState>,
    headers: HeaderMap,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<RankedEntry>>, (StatusCode, String)> {
    let username = requester_from_headers(&headers)?;

    // The ranking engine tolerates unknown requesters; this endpoint does not.
    let known = state
        .accounts
        .exists(&username)
        .await
        .map_err(|e| account_failure(e, "Error retrieving user rank"))?;
    if !known {
        return Err((StatusCode::NOT_FOUND, "User not found".to_string()));
    }

    let top_n = state.config.resolve_top_n(query.limit);
    let entries = state
        .leaderboard
        .get_leaderboard(&username, top_n)
        .await
        .map_err(|e| {
            error!(error = %e, "Leaderboard computation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching leaderboard".to_string(),
            )
        })?;

    Ok(Json(entries))
}

pub fn create_router(state: LeaderboardApiState) -> Router {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .with_state(state)
}
