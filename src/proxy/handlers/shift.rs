// Shift handlers
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use super::relay_error;
use crate::error::ApiError;
use crate::models::FixedShiftRequest;
use crate::proxy::mappers::map_fixed_shift_request;
use crate::proxy::middleware::ClientIp;
use crate::proxy::server::AppState;

pub const SHIFT_NOT_FOUND: &str = "Shift not found";

/// `POST /api/shift/fixed` (and the older `POST /api/shift`)
pub async fn handle_create_fixed_shift(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))?;
    let req: FixedShiftRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))?;

    let upstream_req = map_fixed_shift_request(&req, state.config.affiliate_id());
    debug!("Fixed shift request for quote {}", upstream_req.quote_id);

    state
        .exchange
        .create_fixed_shift(&upstream_req, &ip)
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Fixed shift error: {}", e);
            relay_error(e)
        })
}

/// `GET /api/shifts/:id` - every failure reads as not found
pub async fn handle_get_shift(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(shift_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .exchange
        .get_shift(&shift_id, &ip)
        .await
        .map(Json)
        .map_err(|e| {
            debug!("Shift lookup {} failed: {}", shift_id, e);
            ApiError::new(StatusCode::NOT_FOUND, SHIFT_NOT_FOUND)
        })
}
