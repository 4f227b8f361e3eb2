// Coin listing handler
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::error::ApiError;
use crate::proxy::middleware::ClientIp;
use crate::proxy::server::AppState;

/// `GET /api/coins` - relayed as-is; any failure is a 500
pub async fn handle_list_coins(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<Json<Value>, ApiError> {
    state.exchange.list_coins(&ip).await.map(Json).map_err(|e| {
        tracing::error!("Coin listing failed: {}", e);
        ApiError::with_status(StatusCode::INTERNAL_SERVER_ERROR, &e)
    })
}
