use crate::sim::SimulationEngine;
use crate::subscription::ConnectionManager;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::info;

/// Shared application state for WebSocket handler
#[derive(Clone)]
pub struct WsAppState {
    pub engine: Arc<SimulationEngine>,
    /// Queue depth for each connection's snapshot channel
    pub subscriber_buffer: usize,
}

/// GET /api/fleet/ws - WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsAppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| {
        let manager = ConnectionManager::new(Arc::clone(&state.engine));
        manager.handle(socket, state.subscriber_buffer)
    })
}

/// Create WebSocket router
pub fn create_ws_router(state: Arc<WsAppState>) -> Router {
    Router::new()
        .route("/api/fleet/ws", get(ws_handler))
        .with_state(state)
}
