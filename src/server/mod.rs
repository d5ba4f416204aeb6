//! Reference menu store: the storage side of the editor's contract, kept in
//! memory and served over HTTP.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod response;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use store::MenuStore;

pub use error::ApiError;

#[derive(Clone, Default)]
pub struct AppState {
    menus: Arc<RwLock<HashMap<String, MenuStore>>>,
    auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            menus: Arc::default(),
            auth_token: auth_token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.auth_token.clone())
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Seed a menu, replacing whatever it held
    pub async fn insert_menu(&self, name: impl Into<String>, store: MenuStore) {
        self.menus.write().await.insert(name.into(), store);
    }

    pub async fn menu_count(&self) -> usize {
        self.menus.read().await.len()
    }
}

/// Routes without global middleware
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/menus/:menu/items",
            get(handlers::list_items).put(handlers::replace_items),
        )
        .route("/api/menus/:menu/items/:id", delete(handlers::delete_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::bearer_auth_middleware));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(api)
        .with_state(state)
}

/// Routes plus tracing and CORS as configured
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let mut app = router(state);
    if config.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    if config.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}
