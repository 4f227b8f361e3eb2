// Request logging middleware
use axum::{extract::Request, middleware::Next, response::Response};
use tokio::time::Instant;

/// Log `METHOD URI -> STATUS (ms)` for every request
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed().as_millis();
    if status.is_server_error() {
        tracing::error!("{} {} -> {} ({} ms)", method, uri, status.as_u16(), elapsed);
    } else if status.is_client_error() {
        tracing::warn!("{} {} -> {} ({} ms)", method, uri, status.as_u16(), elapsed);
    } else {
        tracing::info!("{} {} -> {} ({} ms)", method, uri, status.as_u16(), elapsed);
    }

    response
}
