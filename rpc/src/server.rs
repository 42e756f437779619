//! Axum-based RPC server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;

use coffer_node::Treasury;

use crate::error::RpcError;
use crate::handlers;

/// Every route, bound to `treasury`. Mutations go through `/forward/execute`.
pub fn router(treasury: Arc<Treasury>) -> Router {
    Router::new()
        .route("/proposals/:id", get(handlers::get_proposal))
        .route("/proposals/:id/can_execute", get(handlers::can_execute))
        .route("/proposals/:id/votes/:voter", get(handlers::get_user_vote))
        .route("/executable", get(handlers::executable_proposals))
        .route("/balances/:address", get(handlers::get_user_balance))
        .route("/aggregate", get(handlers::get_aggregate))
        .route("/wallets/:address", get(handlers::wallet_balance))
        .route("/nonces/:address", get(handlers::current_nonce))
        .route("/forward/verify", post(handlers::forward_verify))
        .route("/forward/execute", post(handlers::forward_execute))
        .route("/events", get(handlers::drain_events))
        .with_state(treasury)
}

pub struct RpcServer {
    pub port: u16,
    pub treasury: Arc<Treasury>,
}

impl RpcServer {
    pub fn new(port: u16, treasury: Arc<Treasury>) -> Self {
        Self { port, treasury }
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(&self) -> Result<(), RpcError> {
        let app = router(self.treasury.clone());
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!("RPC server listening on {}", addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
