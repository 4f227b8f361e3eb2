use axum::{extract::State, Json};

use crate::models::HealthStatus;
use crate::proxy::server::AppState;

/// `GET /api/health`
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::new(state.exchange.mode()))
}
