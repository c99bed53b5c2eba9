//! Raw key/value passthrough
//!
//! POST /save {"key": ..., "value": ...} writes straight into the store.
//! Values written here share the participant keyspace; a value that is not
//! a participant record is skipped when the leaderboard is computed.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::database::KeyValueStore;

#[derive(Clone)]
pub struct StorageApiState {
    pub store: Arc<dyn KeyValueStore>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// POST /save
pub async fn save_data(
    State(state): State<StorageApiState>,
    Json(payload): Json<SaveRequest>,
) -> Result<String, (StatusCode, String)> {
    let key = payload
        .key
        .filter(|k| !k.is_empty())
        .ok_or((StatusCode::BAD_REQUEST, "Missing key".to_string()))?;
    let value = payload
        .value
        .ok_or((StatusCode::BAD_REQUEST, "Missing value".to_string()))?;

    state.store.set(&key, &value).await.map_err(|e| {
        error!(error = %e, "Raw save failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error saving data".to_string(),
        )
    })?;

    debug!(key = %key, "Raw value saved");
    Ok(format!("Data saved: Key={}, Value={}", key, value))
}

pub fn create_router(state: StorageApiState) -> Router {
    Router::new()
        .route("/save", post(save_data))
        .with_state(state)
}
