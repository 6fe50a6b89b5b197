use crate::sim::SimulationEngine;
use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for service endpoints
pub struct ServiceAppState {
    pub engine: Arc<SimulationEngine>,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub running: bool,
    pub tick: u64,
    pub subscribers: usize,
}

/// Create service router (`/`, `/health`)
pub fn create_service_router(state: Arc<ServiceAppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok",
        service: "fleetsim",
    })
}

async fn health(State(state): State<Arc<ServiceAppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        running: state.engine.is_running(),
        tick: state.engine.current_tick(),
        subscribers: state.engine.registry().len(),
    })
}
