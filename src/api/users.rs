//! Participant account endpoints
//!
//! Endpoints:
//!   POST /login                     -> Register on first sight, otherwise verify password
//!   GET  /api/user/points           -> Current points of the `Username` participant
//!   POST /api/user/incrementPoints  -> Add one point to the `Username` participant

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accounts::AccountService;
use crate::api::{account_failure, requester_from_headers};

#[derive(Clone)]
pub struct UserApiState {
    pub accounts: AccountService,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub points: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u64,
}

/// POST /login
pub async fn login(
    State(state): State<UserApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let outcome = state
        .accounts
        .login(&payload.username, &payload.password)
        .await
        .map_err(|e| account_failure(e, "Error logging in"))?;

    if outcome.created {
        info!(username = %outcome.participant.identifier, "Created a new user");
    }

    Ok(Json(LoginResponse {
        username: outcome.participant.identifier,
        points: outcome.participant.score,
    }))
}

/// GET /api/user/points
pub async fn get_points(
    State(state): State<UserApiState>,
    headers: HeaderMap,
) -> Result<Json<PointsResponse>, (StatusCode, String)> {
    let username = requester_from_headers(&headers)?;

    let points = state
        .accounts
        .points(&username)
        .await
        .map_err(|e| account_failure(e, "Error retrieving user points"))?;

    Ok(Json(PointsResponse { points }))
}

/// POST /api/user/incrementPoints
pub async fn increment_points(
    State(state): State<UserApiState>,
    headers: HeaderMap,
) -> Result<String, (StatusCode, String)> {
    let username = requester_from_headers(&headers)?;

    let points = state
        .accounts
        .increment_points(&username)
        .await
        .map_err(|e| account_failure(e, "Error saving user points"))?;

    Ok(format!(
        "User points incremented for {}. New points: {}",
        username, points
    ))
}

pub fn create_router(state: UserApiState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/api/user/points", get(get_points))
        .route("/api/user/incrementPoints", post(increment_points))
        .with_state(state)
}
