// Handlers module - one file per client-facing operation

pub mod coins;
pub mod health;
pub mod quote;
pub mod shift;

use axum::http::StatusCode;

use crate::error::{ApiError, AppError};

/// Quote/shift error policy: exchange 4xx keep their status, other exchange
/// failures become 400, transport failures 500.
pub(crate) fn relay_error(err: AppError) -> ApiError {
    let status = match &err {
        AppError::Upstream { status, .. } if (400..500).contains(status) => err.status_code(),
        AppError::Upstream { .. } | AppError::InvalidRequest(_) | AppError::Json(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::with_status(status, &err)
}
