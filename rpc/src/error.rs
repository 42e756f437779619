//! RPC error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coffer_node::NodeError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("server error: {0}")]
    Server(String),
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match self {
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RpcError::InvalidRequest(_) | RpcError::Node(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
