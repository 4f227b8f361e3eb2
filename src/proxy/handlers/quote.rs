// Quote handlers
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use super::relay_error;
use crate::error::ApiError;
use crate::models::{LegacyQuoteQuery, QuoteRequest};
use crate::proxy::mappers::map_quote_request;
use crate::proxy::middleware::ClientIp;
use crate::proxy::server::AppState;

/// `POST /api/quote`
pub async fn handle_quote(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))?;
    let req: QuoteRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))?;

    request_quote(&state, &req, &ip).await
}

/// `GET /api/quote?depositAsset=..&settleAsset=..&amount=..`, networks always resolved
pub async fn handle_legacy_quote(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    query: Result<Query<LegacyQuoteQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))?;
    request_quote(&state, &QuoteRequest::from(query), &ip).await
}

async fn request_quote(
    state: &AppState,
    req: &QuoteRequest,
    ip: &str,
) -> Result<Json<Value>, ApiError> {
    let upstream_req = map_quote_request(req, &state.resolver, state.config.affiliate_id());
    debug!("Quote request: {:?}", upstream_req);

    state
        .exchange
        .create_quote(&upstream_req, ip)
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Quote error: {}", e);
            relay_error(e)
        })
}
