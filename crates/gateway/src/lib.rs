//! HTTP Gateway Library
//!
//! REST surface over the commerce services: routing, bearer-token
//! verification, request validation and the OpenAPI document.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use commerce_service_lib::ServiceContainer;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Serve the HTTP API until the listener fails.
pub async fn run(
    services: Arc<dyn ServiceContainer>,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let addr: SocketAddr = config.server.addr().parse()?;
    let state = AppState::new(services, config);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
