use crate::error::AppResult;
use crate::models::Coin;
use crate::proxy::config::{ProxyConfig, ProxyMode};
use crate::proxy::network_resolver::NetworkResolver;
use crate::proxy::upstream::{Exchange, MockExchange, SideShiftClient};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state. Everything is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub exchange: Arc<dyn Exchange>,
    pub resolver: Arc<NetworkResolver>,
}

impl AppState {
    pub fn new(
        config: ProxyConfig,
        exchange: Arc<dyn Exchange>,
        resolver: NetworkResolver,
    ) -> Self {
        Self {
            config: Arc::new(config),
            exchange,
            resolver: Arc::new(resolver),
        }
    }

    /// Validate the config, pick the exchange for the configured mode and, in live
    /// mode, refresh the network table from the exchange's coin list (falling back
    /// to the built-in one).
    pub async fn from_config(config: ProxyConfig) -> AppResult<Self> {
        config.validate()?;

        let exchange: Arc<dyn Exchange> = match config.mode() {
            ProxyMode::Live => Arc::new(SideShiftClient::new(&config)?),
            ProxyMode::Mock => {
                tracing::warn!("No SIDESHIFT_SECRET configured, running in MOCK mode: no exchange calls will be made");
                Arc::new(MockExchange::new())
            }
        };

        let resolver = if config.refresh_networks && exchange.mode() == ProxyMode::Live {
            load_network_resolver(exchange.as_ref()).await
        } else {
            NetworkResolver::builtin()
        };

        Ok(Self::new(config, exchange, resolver))
    }
}

async fn load_network_resolver(exchange: &dyn Exchange) -> NetworkResolver {
    let listing = exchange
        .list_coins(crate::proxy::middleware::FALLBACK_CLIENT_IP)
        .await
        .and_then(|v| serde_json::from_value::<Vec<Coin>>(v).map_err(Into::into));

    match listing {
        Ok(coins) => {
            let resolver = NetworkResolver::from_coins(&coins);
            tracing::info!("Network table refreshed from exchange ({} coins)", resolver.len());
            resolver
        }
        Err(e) => {
            tracing::warn!("Could not load coin list, using built-in network table: {}", e);
            NetworkResolver::builtin()
        }
    }
}

/// Routes of the client-facing contract
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .route("/api/health", get(handlers::health::handle_health))
        .route("/api/coins", get(handlers::coins::handle_list_coins))
        .route(
            "/api/quote",
            post(handlers::quote::handle_quote).get(handlers::quote::handle_legacy_quote),
        )
        .route(
            "/api/shift/fixed",
            post(handlers::shift::handle_create_fixed_shift),
        )
        // Older widget builds post here
        .route("/api/shift", post(handlers::shift::handle_create_fixed_shift))
        .route("/api/shifts/:id", get(handlers::shift::handle_get_shift))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::logging_middleware,
        ))
        .layer(crate::proxy::middleware::cors_layer())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: std::net::SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        host: &str,
        port: u16,
        state: AppState,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), String> {
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind address {}: {}", addr, e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        tracing::info!("Checkout gateway listening on http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Checkout gateway stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
