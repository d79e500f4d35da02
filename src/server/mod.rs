//! HTTP surface: an axum router over a shared [`PlanService`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::service::PlanService;

pub mod routes;

/// Build the router. Exposed separately from [`serve`] so tests can drive it in-process.
pub fn router(service: Arc<PlanService>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/generate-plans", post(routes::generate_plans))
        .route("/api/search", post(routes::search))
        .with_state(service)
}

/// Bind `0.0.0.0:port` and serve until `shutdown` is cancelled.
pub async fn serve(
    service: PlanService,
    port: u16,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router(Arc::new(service)))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}
