//! HTTP surface
//!
//! Routing, request logging and the serve loop. Handlers live in `routes`.

pub mod query;
pub mod routes;
pub mod state;

pub use routes::ApiResponse;
pub use state::AppState;

use crate::utils::{AppError, AppResult};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::time::Instant;

/// Build the router with all record endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/records", get(routes::list_records))
        .route("/records/:id/video", get(routes::get_record_video))
        .route("/records/:id/extra_data", get(routes::get_record_extra_data))
        .route("/records/:id/srt", post(routes::generate_record_srt))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::debug!(
        "{} {} -> {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );

    response
}

/// Serve `state` on `addr` until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("cannot bind {}: {}", addr, e)))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
