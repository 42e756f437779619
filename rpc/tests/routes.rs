//! Route-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use coffer_crypto::keypair_from_seed;
use coffer_forwarder::{sign_request, ForwardRequest};
use coffer_node::{Treasury, TreasuryCall, TreasuryConfig};
use coffer_nullables::NullClock;
use coffer_rpc::router;
use coffer_types::{Address, Amount, KeyPair, VoteChoice};

const DAY: u64 = 86_400;

fn setup() -> (Router, Arc<Treasury>, Arc<NullClock>) {
    let clock = Arc::new(NullClock::new(1_000));
    let treasury =
        Arc::new(Treasury::new(TreasuryConfig::default(), clock.clone()).expect("valid config"));
    (router(treasury.clone()), treasury, clock)
}

fn addr(b: u8) -> String {
    Address::new([b; 20]).to_string()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Body for `/forward/*`: a request from `key` carrying `call`, signed by `signer`.
fn signed_body(
    treasury: &Treasury,
    key: &KeyPair,
    signer: &KeyPair,
    nonce: u64,
    value: u128,
    call: &TreasuryCall,
) -> Value {
    let data = match call {
        TreasuryCall::Deposit => Vec::new(),
        other => other.encode().unwrap(),
    };
    let request = ForwardRequest {
        from: key.address,
        to: treasury.config().treasury_address,
        value: Amount::new(value),
        gas: 100_000,
        nonce,
        data,
    };
    let sig = sign_request(treasury.forwarder().domain(), &request, &signer.private).unwrap();
    json!({ "request": request, "signature": sig.to_hex() })
}

async fn relay(
    app: &Router,
    treasury: &Treasury,
    key: &KeyPair,
    nonce: u64,
    value: u128,
    call: TreasuryCall,
) -> (StatusCode, Value) {
    let body = signed_body(treasury, key, key, nonce, value, &call);
    send(app, "POST", "/forward/execute", Some(body)).await
}

#[tokio::test]
async fn governance_round_over_forwarded_requests() {
    let (app, treasury, clock) = setup();
    let a = keypair_from_seed(&[1u8; 32]).unwrap();
    let b = keypair_from_seed(&[2u8; 32]).unwrap();
    let recipient = Address::new([0xEE; 20]);

    let (status, _) = relay(&app, &treasury, &a, 0, 20, TreasuryCall::Deposit).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = relay(&app, &treasury, &b, 0, 5, TreasuryCall::Deposit).await;
    assert_eq!(status, StatusCode::OK);

    let create = TreasuryCall::CreateProposal {
        recipient,
        amount: Amount::new(5),
        voting_duration_secs: 7 * DAY,
        description: "park benches".into(),
    };
    let (status, receipt) = relay(&app, &treasury, &a, 1, 0, create).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["nonce"], 1);

    for (key, nonce) in [(&a, 2), (&b, 1)] {
        let vote = TreasuryCall::CastVote {
            id: 1,
            choice: VoteChoice::For,
        };
        let (status, _) = relay(&app, &treasury, key, nonce, 0, vote).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, "GET", "/proposals/1", None).await;
    assert_eq!(body["for_votes"], 2);
    assert_eq!(body["state"], "Active");

    clock.advance(8 * DAY);
    let (_, body) = send(&app, "GET", "/executable", None).await;
    assert_eq!(body["ids"], json!([1]));

    let (status, _) =
        relay(&app, &treasury, &b, 2, 0, TreasuryCall::ExecuteProposal { id: 1 }).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/wallets/{recipient}"), None).await;
    assert_eq!(body["amount"], 5);
    let (_, body) = send(&app, "GET", "/aggregate", None).await;
    assert_eq!(body["amount"], 20);

    let (status, body) =
        relay(&app, &treasury, &b, 3, 0, TreasuryCall::ExecuteProposal { id: 1 }).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already executed"));
    let (_, nonce) = send(&app, "GET", &format!("/nonces/{}", b.address), None).await;
    assert_eq!(nonce["nonce"], 3);
}

#[tokio::test]
async fn members_cannot_be_impersonated_over_http() {
    let (app, treasury, _) = setup();
    let victim = keypair_from_seed(&[10u8; 32]).unwrap();
    let attacker = keypair_from_seed(&[11u8; 32]).unwrap();

    relay(&app, &treasury, &victim, 0, 20, TreasuryCall::Deposit).await;
    let create = TreasuryCall::CreateProposal {
        recipient: attacker.address,
        amount: Amount::new(20),
        voting_duration_secs: DAY,
        description: String::new(),
    };
    relay(&app, &treasury, &victim, 1, 0, create).await;

    // No route mutates state on the strength of a JSON sender field.
    for (uri, body) in [
        ("/deposit", json!({ "sender": addr(0xBB), "amount": 1_000_000 })),
        ("/proposals", json!({ "sender": addr(0xBB), "recipient": addr(0xBB), "amount": 1 })),
        (
            "/proposals/1/vote",
            json!({ "sender": victim.address, "choice": "For" }),
        ),
        ("/proposals/1/execute", json!({ "caller": addr(0xBB) })),
    ] {
        let (status, _) = send(&app, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    // A vote in the victim's name signed with another key is refused.
    let vote = TreasuryCall::CastVote {
        id: 1,
        choice: VoteChoice::For,
    };
    let forged = signed_body(&treasury, &victim, &attacker, 2, 0, &vote);
    let (_, verdict) = send(&app, "POST", "/forward/verify", Some(forged.clone())).await;
    assert_eq!(verdict["valid"], false);
    let (status, err) = send(&app, "POST", "/forward/execute", Some(forged)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("invalid signature"));

    let (_, record) = send(
        &app,
        "GET",
        &format!("/proposals/1/votes/{}", victim.address),
        None,
    )
    .await;
    assert_eq!(record["has_voted"], false);
    let (_, balance) = send(&app, "GET", &format!("/balances/{}", addr(0xBB)), None).await;
    assert_eq!(balance["amount"], 0);
    let (_, aggregate) = send(&app, "GET", "/aggregate", None).await;
    assert_eq!(aggregate["amount"], 20);
}

#[tokio::test]
async fn rejections_are_bad_requests() {
    let (app, _, _) = setup();

    let (status, body) = send(&app, "GET", "/proposals/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/balances/not-an-address", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/proposals/1/can_execute", None).await;
    assert_eq!(body["can_execute"], false);
}

#[tokio::test]
async fn vote_view_reports_has_voted() {
    let (app, treasury, _) = setup();
    treasury
        .deposit(Address::new([1; 20]), Amount::new(10))
        .await
        .unwrap();
    let draft = coffer_governance::ProposalDraft {
        recipient: Address::new([9; 20]),
        amount: Amount::new(1),
        voting_duration_secs: DAY,
        description: String::new(),
    };
    treasury
        .create_proposal(Address::new([1; 20]), draft)
        .await
        .unwrap();

    let (_, body) = send(&app, "GET", &format!("/proposals/1/votes/{}", addr(1)), None).await;
    assert_eq!(body["choice"], "Abstain");
    assert_eq!(body["has_voted"], false);
}

#[tokio::test]
async fn forwarded_deposit_over_http() {
    let (app, treasury, _) = setup();
    let key = keypair_from_seed(&[21u8; 32]).unwrap();
    let body = signed_body(&treasury, &key, &key, 0, 12, &TreasuryCall::Deposit);

    let (_, verdict) = send(&app, "POST", "/forward/verify", Some(body.clone())).await;
    assert_eq!(verdict["valid"], true);

    let (status, receipt) = send(&app, "POST", "/forward/execute", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["nonce"], 0);

    let (_, nonce) = send(&app, "GET", &format!("/nonces/{}", key.address), None).await;
    assert_eq!(nonce["nonce"], 1);
    let (_, balance) = send(&app, "GET", &format!("/balances/{}", key.address), None).await;
    assert_eq!(balance["amount"], 12);

    let (status, err) = send(&app, "POST", "/forward/execute", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().unwrap().contains("invalid nonce"));

    let (_, events) = send(&app, "GET", "/events", None).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
}
