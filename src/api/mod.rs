//! HTTP boundary for the registry hub
//!
//! Turns HTTP requests into registry calls. Malformed requests are rejected
//! here with `400 Bad Request` and never reach the registry actor.
//!
//! ## Architecture
//!
//! - **Axum** router with a Tower trace layer
//! - **RegistryHandle** in the shared state, the only path to the registry
//!
//! ## Endpoints
//!
//! - `ANY /` - Report metrics (`Rr-Identity` header + form fields)
//! - `ANY /addIdentity` - Register an identity (form field `name`)
//! - `ANY /requestAll` - Snapshot of every identity as JSON
//!
//! Form fields are read from a urlencoded body and the query string alike
//! (see [`form`]).
//!
//! Every other path is answered like a malformed report.

pub mod error;
pub mod form;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::net::{IpAddr, SocketAddr};

use axum::{Router, routing::any};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::util::{ADD_IDENTITY_PATH, REPORT_PATH, REQUEST_ALL_PATH};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:34567")
    pub bind_addr: SocketAddr,
}

impl ApiConfig {
    pub fn new(addr: IpAddr, port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::new(addr, port),
        }
    }
}

/// Build the hub router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(REPORT_PATH, any(routes::report::report))
        .route(ADD_IDENTITY_PATH, any(routes::identities::add_identity))
        .route(REQUEST_ALL_PATH, any(routes::snapshot::request_all))
        .fallback(routes::report::report)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
