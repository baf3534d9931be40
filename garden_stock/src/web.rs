//! Liveness endpoint for the hosting platform's health checks
//!
//! Stateless; it shares nothing with the polling loop.

use axum::{routing::get, Router};

/// Static body returned by every liveness route
pub const ALIVE_MESSAGE: &str = "Stock notifier is alive";

/// GET / and GET /health
async fn alive_handler() -> &'static str {
    ALIVE_MESSAGE
}

/// Build the liveness router
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(alive_handler))
        .route("/health", get(alive_handler))
}

/// Start the liveness server (async)
///
/// Binds to 0.0.0.0 so the platform's health check can reach it from outside the container.
pub async fn serve(port: u16) -> crate::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    log::info!("Liveness endpoint listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, create_router()).await?;

    Ok(())
}
