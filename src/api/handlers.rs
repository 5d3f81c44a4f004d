//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::FileCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HasResponse, HealthResponse, InfoResponse,
    KeysResponse, SetRequest, SetResponse,
};

/// Application state shared across all handlers.
///
/// `FileCache` serializes its own mutations, so it is shared through a
/// plain `Arc` without an outer lock.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<FileCache>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: FileCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Opens the cache store described by the configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = FileCache::open(&config.cache_dir, config.cache_options()).await?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value under a key, evicting old entries if needed.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidKey(error_msg));
    }

    state.cache.set(&req.key, &req.value).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value: Value = state.cache.get(&key).await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.remove(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /all
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.cache.remove_all().await?;

    Ok(Json(ClearResponse::new()))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Result<Json<KeysResponse>> {
    let keys = state.cache.keys().await?;

    Ok(Json(KeysResponse::new(keys)))
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HasResponse>> {
    let exists = state.cache.has(&key).await?;

    Ok(Json(HasResponse::new(key, exists)))
}

/// Handler for GET /info
///
/// Returns disk usage recomputed from the cache directory.
pub async fn info_handler(State(state): State<AppState>) -> Result<Json<InfoResponse>> {
    let info = state.cache.info().await?;

    Ok(Json(info.into()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheOptions;
    use serde_json::json;

    async fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path(), CacheOptions::default())
            .await
            .unwrap();
        (dir, AppState::new(cache))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let (_dir, state) = test_state().await;

        // Set a value
        let req = SetRequest {
            key: "test_key".to_string(),
            value: json!({ "hello": "world" }),
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        // Get the value
        let result = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        let response = result.unwrap();
        assert_eq!(response.value, json!({ "hello": "world" }));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let (_dir, state) = test_state().await;

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let (_dir, state) = test_state().await;

        // Set a value first
        let req = SetRequest {
            key: "to_delete".to_string(),
            value: json!("value"),
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        // Delete it
        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        // Verify it's gone
        let response = has_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(!response.exists);
    }

    #[tokio::test]
    async fn test_keys_and_clear_handlers() {
        let (_dir, state) = test_state().await;
        for key in ["a", "b"] {
            let req = SetRequest {
                key: key.to_string(),
                value: json!(1),
            };
            set_handler(State(state.clone()), Json(req)).await.unwrap();
        }

        let response = keys_handler(State(state.clone())).await.unwrap();
        assert_eq!(response.keys, vec!["a", "b"]);

        clear_handler(State(state.clone())).await.unwrap();
        let response = keys_handler(State(state)).await.unwrap();
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn test_info_handler() {
        let (_dir, state) = test_state().await;
        let req = SetRequest {
            key: "k".to_string(),
            value: json!("abc"),
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = info_handler(State(state)).await.unwrap();
        assert_eq!(response.size, 5);
        assert_eq!(response.capacities, 1024 * 1024);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let (_dir, state) = test_state().await;

        let req = SetRequest {
            key: "".to_string(), // Empty key is invalid
            value: json!("value"),
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }
}
