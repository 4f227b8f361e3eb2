// proxy module - checkout gateway in front of the exchange API

pub mod config;
pub mod network_resolver;
pub mod server;

pub mod handlers; // API endpoint handlers
pub mod mappers; // Client → exchange request mappers
pub mod middleware; // Axum middleware
pub mod upstream; // Exchange clients (live and mock)

pub use config::{ProxyConfig, ProxyMode};
pub use network_resolver::NetworkResolver;
pub use server::{build_router, AppState, AxumServer};
