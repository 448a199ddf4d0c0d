//! HTTP surface: router assembly and listener settings

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::auth::{self, AuthConfig};
use crate::state::AppState;
use crate::{api, ws};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:7837";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 7837)),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// BIND_ADDR and STATIC_DIR, falling back to defaults on bad input
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid BIND_ADDR {:?} ({}), using {}",
                    raw,
                    e,
                    DEFAULT_BIND_ADDR
                );
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            bind_addr,
            static_dir,
        }
    }
}

/// Serve admin.html from the static directory (used with auth middleware)
async fn serve_admin(State(static_dir): State<Arc<PathBuf>>) -> impl IntoResponse {
    match tokio::fs::read_to_string(static_dir.join("admin.html")).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Admin page not found").into_response(),
    }
}

/// Assemble the full application router
pub fn build_router(state: Arc<AppState>, auth_config: Arc<AuthConfig>, config: &ServerConfig) -> Router {
    let static_dir = Arc::new(config.static_dir.clone());

    // Protected admin routes (with HTTP Basic Auth)
    let admin_page = Router::new()
        .route("/admin", get(serve_admin))
        .with_state(static_dir)
        .layer(middleware::from_fn_with_state(
            auth_config.clone(),
            auth::admin_auth_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/dashboard", get(api::dashboard))
        .layer(middleware::from_fn_with_state(
            auth_config.clone(),
            auth::admin_auth_middleware,
        ));

    // role=admin sockets need credentials, participant sockets do not
    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_handler))
        .layer(middleware::from_fn_with_state(
            auth_config,
            auth::admin_ws_auth_middleware,
        ));

    let public_api = Router::new()
        .route("/api/translation/status", get(api::translation_status))
        .route("/api/leaderboard", get(api::leaderboard));

    Router::new()
        .merge(ws_routes)
        .merge(admin_api)
        .merge(public_api)
        .with_state(state)
        .merge(admin_page)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
