//! HTTP server implementation

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use bytes::Bytes;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::error::{JsonRpcError, RpcError, RpcResult};
use crate::handler::RpcHandler;
use crate::types::{JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::UNSPECIFIED, 8545));

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Maximum request body size (default: 10MB)
    pub max_body_size: usize,
    /// Request timeout (default: 30s)
    pub request_timeout: Duration,
    /// Enable CORS (default: true)
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR,
            max_body_size: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the given address
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }
}

/// RPC server state
pub struct ServerState {
    /// RPC handler for processing requests
    pub handler: RpcHandler,
    /// Time a single request may take before it is answered with an error
    pub request_timeout: Duration,
}

/// RPC HTTP server
pub struct RpcServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl RpcServer {
    /// Create a new RPC server
    pub fn new(config: ServerConfig, handler: RpcHandler) -> Self {
        let state = Arc::new(ServerState {
            handler,
            request_timeout: config.request_timeout,
        });
        Self { config, state }
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        let mut router = Router::new().route("/", post(handle_rpc)).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(self.config.max_body_size)),
        );

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.with_state(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> RpcResult<()> {
        let app = self.build_router();

        let listener = TcpListener::bind(self.config.listen_addr).await?;
        tracing::info!("RPC server listening on {}", self.config.listen_addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| RpcError::Bind(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        Ok(())
    }

    /// Get the server listen address
    pub fn listen_addr(&self) -> SocketAddr {
        self.config.listen_addr
    }
}

/// Handle JSON-RPC requests
///
/// The body is parsed here rather than by an extractor so that malformed
/// JSON gets a JSON-RPC parse error instead of an HTTP rejection.
async fn handle_rpc(State(state): State<Arc<ServerState>>, body: Bytes) -> Json<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable request");
            return Json(JsonRpcResponse::error(
                JsonRpcId::Null,
                JsonRpcError::parse_error(),
            ));
        }
    };

    let id = request.id.clone();
    match tokio::time::timeout(state.request_timeout, state.handler.handle_request(request)).await
    {
        Ok(response) => Json(response),
        Err(_) => Json(JsonRpcResponse::error(
            id,
            JsonRpcError::internal_error("request timed out"),
        )),
    }
}
