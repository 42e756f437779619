//! A treasury instance: ledger, proposals and nonces behind one lock.
//!
//! Every operation takes the lock once, reads the clock once, and either
//! completes or leaves the state as it found it. Events produced by an
//! operation are published to the bus and the poll log only after it
//! succeeds.

use std::sync::Arc;

use tokio::sync::Mutex;

use coffer_forwarder::{
    ForwardReceipt, ForwardRequest, ForwardTarget, ForwarderError, NonceRegistry,
    RequestForwarder,
};
use coffer_governance::{
    PayoutSink, Proposal, ProposalDraft, ProposalState, ProposalStore, VoteRecord, VotingEngine,
};
use coffer_ledger::{LedgerSummary, TreasuryLedger};
use coffer_types::{
    Address, Amount, Clock, ProposalId, Timestamp, TreasuryEvent, VoteChoice,
};

use crate::call::{resolve_sender, TreasuryCall};
use crate::config::TreasuryConfig;
use crate::tracing_spans::treasury_op_span;
use crate::treasury_event::{EventBus, EventLog};
use crate::wallet::WalletBook;
use crate::NodeError;

/// Everything guarded by the treasury lock.
struct TreasuryState<P> {
    ledger: TreasuryLedger,
    store: ProposalStore,
    nonces: NonceRegistry,
    payout: P,
    bus: EventBus,
    log: EventLog,
}

impl<P> TreasuryState<P> {
    fn publish(&mut self, event: TreasuryEvent) {
        self.bus.emit(&event);
        self.log.push(event);
    }
}

/// Shared handle to one treasury instance.
pub struct Treasury<P: PayoutSink + Send = WalletBook> {
    config: TreasuryConfig,
    engine: VotingEngine,
    forwarder: RequestForwarder,
    clock: Arc<dyn Clock>,
    state: Mutex<TreasuryState<P>>,
}

impl Treasury<WalletBook> {
    /// A treasury paying out into an in-memory [`WalletBook`].
    pub fn new(config: TreasuryConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        Self::with_payout(config, clock, WalletBook::new())
    }

    /// Amount `address` has received from executed proposals.
    pub async fn wallet_balance(&self, address: &Address) -> Amount {
        self.state.lock().await.payout.balance(address)
    }
}

impl<P: PayoutSink + Send> Treasury<P> {
    pub fn with_payout(
        config: TreasuryConfig,
        clock: Arc<dyn Clock>,
        payout: P,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let engine = VotingEngine::new(config.governance_params());
        let forwarder = RequestForwarder::new(config.forward_domain());
        let log = EventLog::new(config.event_log_capacity);
        tracing::info!(
            treasury = %config.treasury_address,
            forwarder = %config.forwarder_address,
            chain = %config.chain_id,
            "treasury initialised"
        );
        Ok(Self {
            config,
            engine,
            forwarder,
            clock,
            state: Mutex::new(TreasuryState {
                ledger: TreasuryLedger::new(),
                store: ProposalStore::new(),
                nonces: NonceRegistry::new(),
                payout,
                bus: EventBus::new(),
                log,
            }),
        })
    }

    pub fn config(&self) -> &TreasuryConfig {
        &self.config
    }

    pub fn forwarder(&self) -> &RequestForwarder {
        &self.forwarder
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── State-changing operations ──────────────────────────────────────
    //
    // These take an already-authenticated sender. Untrusted callers reach
    // the treasury only through `execute_forward`.

    pub async fn deposit(&self, sender: Address, amount: Amount) -> Result<TreasuryEvent, NodeError> {
        let mut state = self.state.lock().await;
        let _span = treasury_op_span("deposit", &sender).entered();
        let event = state.ledger.deposit(sender, amount)?;
        state.publish(event.clone());
        Ok(event)
    }

    pub async fn create_proposal(
        &self,
        sender: Address,
        draft: ProposalDraft,
    ) -> Result<ProposalId, NodeError> {
        let mut guard = self.state.lock().await;
        let _span = treasury_op_span("create_proposal", &sender).entered();
        let now = self.clock.now();
        let state = &mut *guard;
        let (id, event) =
            self.engine
                .create_proposal(&mut state.store, &state.ledger, sender, draft, now)?;
        state.publish(event);
        Ok(id)
    }

    pub async fn cast_vote(
        &self,
        sender: Address,
        id: ProposalId,
        choice: VoteChoice,
    ) -> Result<TreasuryEvent, NodeError> {
        let mut guard = self.state.lock().await;
        let _span = treasury_op_span("cast_vote", &sender).entered();
        let now = self.clock.now();
        let state = &mut *guard;
        let event = self
            .engine
            .cast_vote(&mut state.store, &state.ledger, sender, id, choice, now)?;
        state.publish(event.clone());
        Ok(event)
    }

    /// Execute an approved proposal. `caller` only identifies who triggered it.
    pub async fn execute_proposal(
        &self,
        caller: Address,
        id: ProposalId,
    ) -> Result<TreasuryEvent, NodeError> {
        let mut guard = self.state.lock().await;
        let _span = treasury_op_span("execute_proposal", &caller).entered();
        let now = self.clock.now();
        let state = &mut *guard;
        let event = self.engine.execute_proposal(
            &mut state.store,
            &mut state.ledger,
            id,
            now,
            &mut state.payout,
        )?;
        state.publish(event.clone());
        Ok(event)
    }

    /// A direct call with encoded calldata, attributed to `caller`.
    ///
    /// Only the forwarder's own relay may act as the trusted forwarder, so a
    /// direct call claiming that address is refused before anything runs.
    pub async fn call(
        &self,
        caller: Address,
        value: Amount,
        calldata: &[u8],
    ) -> Result<Vec<u8>, NodeError> {
        if caller == self.config.forwarder_address {
            return Err(NodeError::SpoofedForwarder(caller));
        }
        let mut guard = self.state.lock().await;
        let now = self.clock.now();
        let state = &mut *guard;
        let _span = treasury_op_span("call", &caller).entered();
        let (output, event) = dispatch(
            &self.engine,
            &mut state.ledger,
            &mut state.store,
            &mut state.payout,
            caller,
            value,
            calldata,
            now,
        )?;
        state.publish(event);
        Ok(output)
    }

    // ── Forwarder ──────────────────────────────────────────────────────

    /// Whether a signed request would be accepted now. No side effects.
    pub async fn verify_forward(&self, request: &ForwardRequest, signature: &[u8]) -> bool {
        let state = self.state.lock().await;
        self.forwarder.verify(&state.nonces, request, signature)
    }

    /// Verify a signed request, consume its nonce and run it against the treasury.
    pub async fn execute_forward(
        &self,
        request: &ForwardRequest,
        signature: &[u8],
    ) -> Result<ForwardReceipt, NodeError> {
        let mut guard = self.state.lock().await;
        let now = self.clock.now();
        let state = &mut *guard;

        let mut target = TreasuryTarget {
            engine: &self.engine,
            treasury: self.config.treasury_address,
            trusted_forwarder: self.config.forwarder_address,
            ledger: &mut state.ledger,
            store: &mut state.store,
            payout: &mut state.payout,
            now,
            events: Vec::new(),
        };
        let receipt = self
            .forwarder
            .execute(&mut state.nonces, request, signature, &mut target)?;
        let events = target.events;
        for event in events {
            state.publish(event);
        }
        Ok(receipt)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub async fn get_proposal(&self, id: ProposalId) -> Result<Proposal, NodeError> {
        let state = self.state.lock().await;
        Ok(state.store.get(id)?.clone())
    }

    /// Last choice `voter` cast on `id`; `Abstain` if they never voted.
    pub async fn get_user_vote(
        &self,
        id: ProposalId,
        voter: &Address,
    ) -> Result<VoteChoice, NodeError> {
        Ok(self.get_vote_record(id, voter).await?.choice)
    }

    /// Like [`Treasury::get_user_vote`] but tells a silent member from an abstention.
    pub async fn get_vote_record(
        &self,
        id: ProposalId,
        voter: &Address,
    ) -> Result<VoteRecord, NodeError> {
        let state = self.state.lock().await;
        state.store.get(id)?;
        Ok(state.store.vote_record(id, voter))
    }

    pub async fn get_user_balance(&self, address: &Address) -> Amount {
        self.state.lock().await.ledger.balance_of(address)
    }

    pub async fn get_aggregate(&self) -> Amount {
        self.state.lock().await.ledger.aggregate()
    }

    pub async fn can_execute(&self, id: ProposalId) -> bool {
        let state = self.state.lock().await;
        self.engine
            .can_execute(&state.store, &state.ledger, id, self.clock.now())
    }

    pub async fn executable_proposals(&self) -> Vec<ProposalId> {
        let state = self.state.lock().await;
        self.engine
            .executable_proposals(&state.store, &state.ledger, self.clock.now())
    }

    pub async fn proposal_state(&self, id: ProposalId) -> Result<ProposalState, NodeError> {
        let state = self.state.lock().await;
        Ok(self
            .engine
            .proposal_state(&state.store, id, self.clock.now())?)
    }

    pub async fn proposal_count(&self) -> u64 {
        self.state.lock().await.store.count()
    }

    pub async fn current_nonce(&self, address: &Address) -> u64 {
        self.state.lock().await.nonces.current_nonce(address)
    }

    pub async fn ledger_summary(&self) -> LedgerSummary {
        self.state.lock().await.ledger.summary()
    }

    // ── Observers ──────────────────────────────────────────────────────

    pub async fn subscribe(&self, listener: Box<dyn Fn(&TreasuryEvent) + Send + Sync>) {
        self.state.lock().await.bus.subscribe(listener);
    }

    /// Take every event published since the last drain, oldest first.
    pub async fn drain_events(&self) -> Vec<TreasuryEvent> {
        self.state.lock().await.log.drain()
    }

    /// Run `f` against the payout sink under the treasury lock.
    pub async fn with_payout_sink<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.state.lock().await.payout)
    }
}

/// The treasury as seen by the forwarder: a relay target over borrowed state.
struct TreasuryTarget<'a, P> {
    engine: &'a VotingEngine,
    treasury: Address,
    trusted_forwarder: Address,
    ledger: &'a mut TreasuryLedger,
    store: &'a mut ProposalStore,
    payout: &'a mut P,
    now: Timestamp,
    events: Vec<TreasuryEvent>,
}

impl<P: PayoutSink> ForwardTarget for TreasuryTarget<'_, P> {
    fn relay(
        &mut self,
        caller: &Address,
        to: &Address,
        value: Amount,
        calldata: &[u8],
    ) -> Result<Vec<u8>, ForwarderError> {
        if *to != self.treasury {
            return Err(ForwarderError::UnknownTarget(*to));
        }
        let (sender, payload) = resolve_sender(caller, &self.trusted_forwarder, calldata)
            .map_err(|e| ForwarderError::RelayFailed(e.to_string()))?;
        let (output, event) = dispatch(
            self.engine,
            self.ledger,
            self.store,
            self.payout,
            sender,
            value,
            payload,
            self.now,
        )
        .map_err(|e| ForwarderError::RelayFailed(e.to_string()))?;
        self.events.push(event);
        Ok(output)
    }
}

/// Decode `payload` and run it as `sender`.
///
/// An empty payload with attached value is a plain deposit.
#[allow(clippy::too_many_arguments)]
fn dispatch<P: PayoutSink>(
    engine: &VotingEngine,
    ledger: &mut TreasuryLedger,
    store: &mut ProposalStore,
    payout: &mut P,
    sender: Address,
    value: Amount,
    payload: &[u8],
    now: Timestamp,
) -> Result<(Vec<u8>, TreasuryEvent), NodeError> {
    let call = if payload.is_empty() && !value.is_zero() {
        TreasuryCall::Deposit
    } else {
        TreasuryCall::decode(payload)?
    };
    if !value.is_zero() && !call.is_payable() {
        return Err(NodeError::NonPayable(call.name()));
    }
    tracing::debug!(call = call.name(), sender = %sender, "dispatching call");

    match call {
        TreasuryCall::Deposit => Ok((Vec::new(), ledger.deposit(sender, value)?)),
        TreasuryCall::CreateProposal {
            recipient,
            amount,
            voting_duration_secs,
            description,
        } => {
            let draft = ProposalDraft {
                recipient,
                amount,
                voting_duration_secs,
                description,
            };
            let (id, event) = engine.create_proposal(store, ledger, sender, draft, now)?;
            Ok((bincode::serialize(&id)?, event))
        }
        TreasuryCall::CastVote { id, choice } => Ok((
            Vec::new(),
            engine.cast_vote(store, ledger, sender, id, choice, now)?,
        )),
        TreasuryCall::ExecuteProposal { id } => Ok((
            Vec::new(),
            engine.execute_proposal(store, ledger, id, now, payout)?,
        )),
    }
}
