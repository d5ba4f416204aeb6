use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use super::error::ApiError;
use super::response::{ApiResponse, ApiResult};
use super::AppState;
use crate::menu::{FlatMenuItem, PersistedId, RemoteMenuItem};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Menu Admin store",
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "items": "/api/menus/:menu/items (GET list, PUT full replace)",
                "item": "/api/menus/:menu/items/:id (DELETE)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "menus": state.menu_count().await,
        }
    }))
}

/// GET /api/menus/:menu/items - every row of the menu, empty for unknown menus
pub async fn list_items(State(state): State<AppState>, Path(menu): Path<String>) -> ApiResult<Vec<RemoteMenuItem>> {
    let menus = state.menus.read().await;
    let items = menus.get(&menu).map(|store| store.items().to_vec()).unwrap_or_default();
    tracing::debug!("Listing {} items of menu '{}'", items.len(), menu);
    Ok(ApiResponse::success(items))
}

/// PUT /api/menus/:menu/items - replace the whole menu
pub async fn replace_items(
    State(state): State<AppState>,
    Path(menu): Path<String>,
    Json(items): Json<Vec<FlatMenuItem>>,
) -> ApiResult<Value> {
    let mut menus = state.menus.write().await;
    let store = menus.entry(menu.clone()).or_default();
    store.replace(&items).map_err(|e| {
        tracing::warn!("Rejected replace of menu '{}': {}", menu, e);
        ApiError::from(e)
    })?;
    tracing::info!("Menu '{}' replaced with {} items", menu, store.len());
    Ok(ApiResponse::success(json!({ "count": store.len() })))
}

/// DELETE /api/menus/:menu/items/:id - remove one row
pub async fn delete_item(
    State(state): State<AppState>,
    Path((menu, id)): Path<(String, PersistedId)>,
) -> ApiResult<()> {
    let mut menus = state.menus.write().await;
    let store = menus
        .get_mut(&menu)
        .ok_or_else(|| ApiError::not_found(format!("Menu '{}' not found", menu)))?;
    store.remove(id)?;
    tracing::info!("Deleted item {} from menu '{}'", id, menu);
    Ok(ApiResponse::no_content())
}
