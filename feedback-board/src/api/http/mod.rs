pub mod error;
pub mod handlers;
pub mod headers;
pub mod state;
pub mod types;

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use tower_http::cors::{AllowMethods, Any, CorsLayer};

use crate::board::Board;
use crate::config::BoardConfig;
use handlers::{admin, comments, health};
use state::AppState;

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/stats", get(admin::stats))
        .route("/api/comments", get(comments::list_comments).post(comments::create_comment))
        .route(
            "/api/comments/{id}",
            get(comments::get_comment).patch(comments::patch_comment).delete(comments::delete_comment),
        )
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route("/api/admin/session", get(admin::session))
        .with_state(state)
        .layer(cors)
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    let list = origins.iter().filter_map(|s| HeaderValue::from_str(s.trim()).ok()).collect::<Vec<_>>();
    if !list.is_empty() {
        return CorsLayer::new().allow_origin(list).allow_methods(AllowMethods::any()).allow_headers(Any);
    }
    CorsLayer::new().allow_origin(Any).allow_methods(AllowMethods::any()).allow_headers(Any)
}

/// Runs the HTTP API until Ctrl-C, then flushes the store.
pub async fn serve(config: BoardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let board = Board::open(&config)?;
    if config.admin_password.is_none() {
        warn!("no admin password configured; admin login is disabled");
    }
    let state = AppState::from_config(board.clone(), &config);
    let app = router(state, build_cors(&config.cors_origins));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("feedback-board listening on http://{addr}/");
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown requested");
    };
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    board.comments().flush()?;
    info!("store flushed, bye");
    Ok(())
}
