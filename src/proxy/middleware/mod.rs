// Middleware module - Axum middleware

pub mod client_ip;
pub mod cors;
pub mod logging;

pub use client_ip::{client_ip_from_headers, ClientIp, FALLBACK_CLIENT_IP};
pub use cors::cors_layer;
pub use logging::logging_middleware;
