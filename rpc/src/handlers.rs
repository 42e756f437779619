//! RPC request handlers.
//!
//! Each handler decodes its request, makes one call on the treasury and
//! encodes the result. No treasury logic lives here.
//!
//! Reads are open. The only state-changing route is `forward/execute`,
//! which acts for whoever signed the request.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use coffer_forwarder::{ForwardReceipt, ForwardRequest};
use coffer_governance::{Proposal, ProposalState};
use coffer_node::{tracing_spans::rpc_span, Treasury};
use coffer_types::{Address, Amount, ProposalId, TreasuryEvent, VoteChoice};

use crate::error::RpcError;

pub type AppState = Arc<Treasury>;

fn parse_address(raw: &str) -> Result<Address, RpcError> {
    raw.parse()
        .map_err(|e: coffer_types::TypesError| RpcError::InvalidRequest(e.to_string()))
}

// ── Proposals ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub state: ProposalState,
}

pub async fn get_proposal(
    State(treasury): State<AppState>,
    Path(id): Path<ProposalId>,
) -> Result<Json<ProposalView>, RpcError> {
    let proposal = treasury.get_proposal(id).await?;
    let state = treasury.proposal_state(id).await?;
    Ok(Json(ProposalView { proposal, state }))
}

#[derive(Serialize, Deserialize)]
pub struct VoteView {
    pub choice: VoteChoice,
    pub has_voted: bool,
}

pub async fn get_user_vote(
    State(treasury): State<AppState>,
    Path((id, voter)): Path<(ProposalId, String)>,
) -> Result<Json<VoteView>, RpcError> {
    let voter = parse_address(&voter)?;
    let record = treasury.get_vote_record(id, &voter).await?;
    Ok(Json(VoteView {
        choice: record.choice,
        has_voted: record.has_voted,
    }))
}

#[derive(Serialize, Deserialize)]
pub struct CanExecuteResponse {
    pub can_execute: bool,
}

pub async fn can_execute(
    State(treasury): State<AppState>,
    Path(id): Path<ProposalId>,
) -> Json<CanExecuteResponse> {
    Json(CanExecuteResponse {
        can_execute: treasury.can_execute(id).await,
    })
}

#[derive(Serialize, Deserialize)]
pub struct ExecutableResponse {
    pub ids: Vec<ProposalId>,
}

pub async fn executable_proposals(State(treasury): State<AppState>) -> Json<ExecutableResponse> {
    Json(ExecutableResponse {
        ids: treasury.executable_proposals().await,
    })
}

// ── Balances and nonces ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct AmountResponse {
    pub amount: Amount,
}

pub async fn get_user_balance(
    State(treasury): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AmountResponse>, RpcError> {
    let address = parse_address(&address)?;
    Ok(Json(AmountResponse {
        amount: treasury.get_user_balance(&address).await,
    }))
}

pub async fn get_aggregate(State(treasury): State<AppState>) -> Json<AmountResponse> {
    Json(AmountResponse {
        amount: treasury.get_aggregate().await,
    })
}

pub async fn wallet_balance(
    State(treasury): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AmountResponse>, RpcError> {
    let address = parse_address(&address)?;
    Ok(Json(AmountResponse {
        amount: treasury.wallet_balance(&address).await,
    }))
}

#[derive(Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: u64,
}

pub async fn current_nonce(
    State(treasury): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<NonceResponse>, RpcError> {
    let address = parse_address(&address)?;
    Ok(Json(NonceResponse {
        nonce: treasury.current_nonce(&address).await,
    }))
}

// ── Forwarder ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForwardBody {
    pub request: ForwardRequest,
    /// Hex-encoded, `0x` optional. Any length is accepted here; the
    /// forwarder rejects anything but 65 bytes.
    pub signature: String,
}

impl ForwardBody {
    fn signature_bytes(&self) -> Result<Vec<u8>, RpcError> {
        let raw = self.signature.strip_prefix("0x").unwrap_or(&self.signature);
        hex::decode(raw).map_err(|e| RpcError::InvalidRequest(format!("signature: {e}")))
    }
}

#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

pub async fn forward_verify(
    State(treasury): State<AppState>,
    Json(body): Json<ForwardBody>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let signature = body.signature_bytes()?;
    Ok(Json(VerifyResponse {
        valid: treasury.verify_forward(&body.request, &signature).await,
    }))
}

pub async fn forward_execute(
    State(treasury): State<AppState>,
    Json(body): Json<ForwardBody>,
) -> Result<Json<ForwardReceipt>, RpcError> {
    let signature = body.signature_bytes()?;
    let receipt = treasury
        .execute_forward(&body.request, &signature)
        .instrument(rpc_span("forward_execute"))
        .await?;
    Ok(Json(receipt))
}

// ── Events ───────────────────────────────────────────────────────────────

pub async fn drain_events(State(treasury): State<AppState>) -> Json<Vec<TreasuryEvent>> {
    Json(treasury.drain_events().await)
}
