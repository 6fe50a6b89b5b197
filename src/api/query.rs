use crate::sim::{SimulationEngine, VehicleView, WorldSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the polling API
pub struct QueryAppState {
    pub engine: Arc<SimulationEngine>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create polling API router
pub fn create_query_router(state: Arc<QueryAppState>) -> Router {
    Router::new()
        .route("/api/fleet/state", get(get_state))
        .route("/api/fleet/state/vehicles/:id", get(get_vehicle))
        .with_state(state)
}

/// GET /api/fleet/state - Latest world snapshot (polling alternative to the stream)
async fn get_state(State(state): State<Arc<QueryAppState>>) -> Json<WorldSnapshot> {
    let snapshot = state.engine.current_snapshot();
    Json(snapshot.as_ref().clone())
}

/// GET /api/fleet/state/vehicles/:id - One visible vehicle from the latest snapshot
async fn get_vehicle(
    State(state): State<Arc<QueryAppState>>,
    Path(id): Path<String>,
) -> Result<Json<VehicleView>, QueryError> {
    let snapshot = state.engine.current_snapshot();
    let vehicle = snapshot.vehicle(&id).ok_or(QueryError::NotFound)?;
    Ok(Json(vehicle.clone()))
}

/// Query error types
#[derive(Debug)]
enum QueryError {
    /// Unknown id, or vehicle currently hidden
    NotFound,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            QueryError::NotFound => (StatusCode::NOT_FOUND, "Vehicle not found"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
        });

        (status, body).into_response()
    }
}
