//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with the API, upload and frontend routes
//! - Middleware stack (request id, logging, CORS, compression, timeout)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{categories, files, health, method_not_allowed, upload};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::middleware::from_fn;
use axum::routing::{any, delete, get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Permissive CORS matching what the frontend sends
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
        ])
}

/// Build the Axum router with all routes and middleware
///
/// Routes:
/// - `/api/*`: upload, list, delete, categories, health
/// - `/uploads/*`: stored files, 404 when absent
/// - anything else: frontend assets with SPA fallback to the index document
///
/// Middleware stack (outermost first):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS (answers every OPTIONS preflight directly)
/// 5. Compression
/// 6. Timeout handling
///
/// CORS wraps the assembled router as a single service. Layered per route it
/// would sit inside each method router, which adds its own `allow` header to
/// preflight answers.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let config = state.config.clone();

    let api_routes = Router::new()
        .route(
            "/api/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(config.max_upload_size)),
        )
        .route("/api/files", get(files::list_files))
        .route("/api/files/", delete(files::delete_without_filename))
        .route("/api/files/{filename}", delete(files::delete_file))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/health", any(health::health_check))
        .method_not_allowed_fallback(method_not_allowed);

    let frontend = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.index_document()));

    let router: Router = api_routes
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .fallback_service(frontend)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .with_state(state);

    let router = if config.enable_cors {
        Router::new().fallback_service(cors_layer().layer(router))
    } else {
        router
    };

    router
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
}

/// Initialize structured JSON logging
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();
}

/// Start the HTTP server
///
/// Bootstraps directories, loads the file index, builds the router and serves
/// until SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    health::mark_start();

    let addr: SocketAddr = config.socket_addr()?;
    let state = Arc::new(ServerState::new(config));
    let file_count = state.store.len().await;

    let app = build_router(state.clone());

    tracing::info!("Starting HTML card server on {}", addr);
    tracing::info!(
        "Uploads: {}, max upload: {} bytes",
        state.config.upload_dir.display(),
        state.config.max_upload_size
    );
    tracing::info!(
        "Storage: file-based ({}), {} records",
        state.store.path().display(),
        file_count
    );
    tracing::info!(
        "Frontend: {}, CORS: {}",
        state.config.static_dir.display(),
        state.config.enable_cors
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
