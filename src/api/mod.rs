// HTTP and WebSocket APIs

pub mod query;
pub mod service;
pub mod websocket;

pub use query::{create_query_router, QueryAppState};
pub use service::{create_service_router, ServiceAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::config::ServerConfig;
use crate::sim::SimulationEngine;
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Assemble every router behind the configured CORS policy
pub fn create_app(
    engine: Arc<SimulationEngine>,
    server: &ServerConfig,
    subscriber_buffer: usize,
) -> Result<Router> {
    let ws_state = Arc::new(WsAppState {
        engine: Arc::clone(&engine),
        subscriber_buffer,
    });
    let query_state = Arc::new(QueryAppState {
        engine: Arc::clone(&engine),
    });
    let service_state = Arc::new(ServiceAppState { engine });

    Ok(Router::new()
        .merge(create_service_router(service_state))
        .merge(create_query_router(query_state))
        .merge(create_ws_router(ws_state))
        .layer(cors_layer(&server.cors_origin)?))
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("Invalid CORS origin '{}'", origin))?;
    Ok(layer.allow_origin(origin))
}
