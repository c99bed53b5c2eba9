//! HTTP API endpoints for the leaderboard service
//!
//! Provides REST APIs for:
//! - Account login/registration and points
//! - The ranked leaderboard
//! - Raw key/value passthrough writes
//! - Middleware (CORS, body limits, security headers)

pub mod leaderboard;
pub mod middleware;
pub mod storage;
pub mod users;

use axum::{
    http::{HeaderMap, StatusCode},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::accounts::AccountService;
use crate::config::LeaderboardConfig;
use crate::database::{KeyValueStore, ParticipantRepository, TimedStore};
use crate::error::AccountError;
use crate::ranking::{LeaderboardService, RankingEngine};

pub use leaderboard::{LeaderboardApiState, create_router as create_leaderboard_router};
pub use middleware::{RequestLimits, body_size_middleware, cors_layer, security_headers_middleware};
pub use storage::{StorageApiState, create_router as create_storage_router};
pub use users::{UserApiState, create_router as create_user_router};

/// Header naming the participant a request acts for
pub const USERNAME_HEADER: &str = "Username";

/// Services shared by every router
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub accounts: AccountService,
    pub leaderboard: LeaderboardService,
    pub config: Arc<LeaderboardConfig>,
}

impl AppState {
    /// Wire the services on top of a raw store. Every store call made
    /// through the returned state is bounded by the configured timeout.
    pub fn new(raw_store: Arc<dyn KeyValueStore>, config: Arc<LeaderboardConfig>) -> Self {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(TimedStore::new(raw_store, config.store.timeout()));
        let repository = ParticipantRepository::new(store.clone());
        let engine = RankingEngine::new(config.leaderboard.tie_policy);

        Self {
            store,
            accounts: AccountService::new(repository.clone()),
            leaderboard: LeaderboardService::new(repository, engine),
            config,
        }
    }
}

/// Build the full application router
pub fn create_app(state: AppState) -> Router {
    let limits = RequestLimits {
        max_request_size: state.config.security.max_request_size,
    };

    Router::new()
        .merge(create_user_router(UserApiState {
            accounts: state.accounts.clone(),
        }))
        .merge(create_leaderboard_router(LeaderboardApiState {
            leaderboard: state.leaderboard.clone(),
            accounts: state.accounts.clone(),
            config: state.config.clone(),
        }))
        .merge(create_storage_router(StorageApiState {
            store: state.store.clone(),
        }))
        .route("/health", get(|| async { "OK" }))
        .layer(axum_middleware::from_fn_with_state(
            limits,
            body_size_middleware,
        ))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Read the requesting participant from the `Username` header
pub(crate) fn requester_from_headers(headers: &HeaderMap) -> Result<String, (StatusCode, String)> {
    headers
        .get(USERNAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Missing Username header".to_string(),
        ))
}

/// Map an account error to a response without leaking store details
pub(crate) fn account_failure(err: AccountError, server_message: &str) -> (StatusCode, String) {
    match err {
        AccountError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AccountError::NotFound(username) => (
            StatusCode::NOT_FOUND,
            format!("User not found for username: {}", username),
        ),
        AccountError::InvalidInput(reason) => (StatusCode::BAD_REQUEST, reason),
        other => {
            error!(error = %other, "{}", server_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                server_message.to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LeaderboardError, StoreError};
    use axum::http::HeaderValue;

    #[test]
    fn test_requester_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            requester_from_headers(&headers).unwrap_err().0,
            StatusCode::BAD_REQUEST
        );

        headers.insert(USERNAME_HEADER, HeaderValue::from_static("  alice "));
        assert_eq!(requester_from_headers(&headers).unwrap(), "alice");
    }

    #[test]
    fn test_account_failure_mapping() {
        assert_eq!(
            account_failure(AccountError::InvalidCredentials, "x").0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            account_failure(AccountError::NotFound("bob".to_string()), "x").0,
            StatusCode::NOT_FOUND
        );

        let store_down = AccountError::Store(LeaderboardError::StoreUnavailable(
            StoreError::Unavailable("10.0.0.3 refused".to_string()),
        ));
        let (status, body) = account_failure(store_down, "Error retrieving user points");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error retrieving user points");
    }
}
