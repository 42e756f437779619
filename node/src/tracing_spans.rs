//! Pre-built [`tracing::Span`] constructors for common treasury operations.
//!
//! Using consistent span names and field sets makes it easy to filter and
//! correlate traces across the treasury, the forwarder and the RPC layer.

use coffer_types::Address;
use tracing::{info_span, Span};

/// Span covering one state-changing treasury operation.
pub fn treasury_op_span(op: &str, sender: &Address) -> Span {
    info_span!("treasury_op", op = %op, sender = %sender)
}

/// Span covering a single RPC action handled by the RPC server.
pub fn rpc_span(action: &str) -> Span {
    info_span!("rpc", action = %action)
}
