//! Controller integration tests for strata-sdk
//!
//! Runs the sign/send/confirm pipeline against a scripted transport.

use serde_json::{json, Value};
use strata_sdk::{
    methods, Address, Behavior, Controller, LedgerClient, MockTransport, RawData, SdkError,
    Transaction, TransactionInfo, TriggerSmartContract, Wallet, H160,
};
use tokio::time::{Duration, Instant};

fn unsigned() -> Transaction {
    let contract = TriggerSmartContract::new(
        Address::from_account_id(H160::from_bytes([0xaa; 20])),
        Address::from_account_id(H160::from_bytes([0xbb; 20])),
        vec![0xa9, 0x05, 0x9c, 0xbb],
    );
    let mut raw = RawData::new(contract);
    raw.fee_limit = 1_000_000;
    Transaction::new(raw)
}

fn info_for(tx: &Transaction, result: i32, message: &str) -> Value {
    let label = if result == 0 { "SUCCESS" } else { "REVERT" };
    json!({
        "id": tx.txid().to_plain_hex(),
        "fee": 1100,
        "block_number": 42,
        "receipt": {"energy_usage_total": 13000, "result": label},
        "result": result,
        "res_message": message,
    })
}

// ==================== Dry Run ====================

#[tokio::test]
async fn test_dry_run_signs_without_network() {
    let mock = MockTransport::new();
    let client = LedgerClient::with_transport(mock.clone());
    let wallet = Wallet::new_random();

    let behavior = Behavior::default().dry_run(true);
    let mut controller = Controller::new(&client, Some(&wallet), unsigned(), behavior);
    controller.execute().await.unwrap();

    assert!(controller.execution_error().is_none());
    assert!(controller.transaction().is_signed());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_dry_run_ignores_confirmation_wait() {
    let mock = MockTransport::new();
    let client = LedgerClient::with_transport(mock.clone());
    let wallet = Wallet::new_random();

    let behavior = Behavior::with_confirmation().dry_run(true);
    let mut controller = Controller::new(&client, Some(&wallet), unsigned(), behavior);
    controller.execute().await.unwrap();

    assert!(mock.calls().is_empty());
    assert!(controller.receipt().is_none());
}

// ==================== Confirmation ====================

#[tokio::test(start_paused = true)]
async fn test_confirmation_timeout() {
    let mock = MockTransport::new();
    mock.set_response(methods::BROADCAST_TRANSACTION, json!({"result": true}));
    mock.set_response(methods::GET_TRANSACTION_INFO_BY_ID, json!({}));
    let client = LedgerClient::with_transport(mock.clone());
    let wallet = Wallet::new_random();

    let start = Instant::now();
    let behavior = Behavior::default().confirmation_wait(2);
    let mut controller = Controller::new(&client, Some(&wallet), unsigned(), behavior);
    let err = controller.execute().await.unwrap_err();

    assert_eq!(err, SdkError::ConfirmationTimeout { seconds: 2 });
    assert_eq!(err.to_string(), "could not confirm transaction after 2 seconds");
    assert!(controller.receipt().is_none());
    assert!(controller.result_error().is_none());
    assert_eq!(mock.call_count(methods::GET_TRANSACTION_INFO_BY_ID), 3);
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_after_retries() {
    let tx = unsigned();
    let mock = MockTransport::new();
    mock.set_response(methods::BROADCAST_TRANSACTION, json!({"result": true}));
    mock.push_response(methods::GET_TRANSACTION_INFO_BY_ID, json!({}));
    mock.push_error(
        methods::GET_TRANSACTION_INFO_BY_ID,
        SdkError::Transport("connection reset".to_string()),
    );
    mock.set_response(methods::GET_TRANSACTION_INFO_BY_ID, info_for(&tx, 0, ""));
    let client = LedgerClient::with_transport(mock.clone());
    let wallet = Wallet::new_random();

    let mut controller = Controller::new(&client, Some(&wallet), tx, Behavior::with_confirmation());
    controller.execute().await.unwrap();

    let receipt = controller.receipt().unwrap();
    assert_eq!(receipt.block_number, 42);
    assert!(controller.result_error().is_none());
    assert_eq!(mock.call_count(methods::GET_TRANSACTION_INFO_BY_ID), 3);
}

#[tokio::test]
async fn test_on_chain_failure_is_result_error() {
    let tx = unsigned();
    let mock = MockTransport::new();
    mock.set_response(methods::BROADCAST_TRANSACTION, json!({"result": true}));
    mock.set_response(
        methods::GET_TRANSACTION_INFO_BY_ID,
        info_for(&tx, 1, "REVERT opcode executed"),
    );
    let client = LedgerClient::with_transport(mock);
    let wallet = Wallet::new_random();

    let mut controller = Controller::new(&client, Some(&wallet), tx, Behavior::with_confirmation());
    // Sent fine, failed on chain
    controller.execute().await.unwrap();

    assert!(controller.execution_error().is_none());
    assert_eq!(
        controller.result_error(),
        Some(&SdkError::OnChain {
            code: 1,
            message: "REVERT opcode executed".to_string(),
        })
    );
    assert!(controller.receipt().unwrap().is_failed());
}

#[tokio::test]
async fn test_lookup_uses_signed_transaction_id() {
    let tx = unsigned();
    let txid = tx.txid();
    let mock = MockTransport::new();
    mock.set_response(methods::BROADCAST_TRANSACTION, json!({"result": true}));
    mock.set_response(methods::GET_TRANSACTION_INFO_BY_ID, info_for(&tx, 0, ""));
    let client = LedgerClient::with_transport(mock.clone());
    let wallet = Wallet::new_random();

    let mut controller = Controller::new(&client, Some(&wallet), tx, Behavior::with_confirmation());
    controller.execute().await.unwrap();

    let lookup = mock
        .calls()
        .into_iter()
        .find(|c| c.method == methods::GET_TRANSACTION_INFO_BY_ID)
        .unwrap();
    assert_eq!(lookup.params, vec![json!(txid.to_plain_hex())]);
    assert_eq!(controller.transaction_hash(), txid);
}

// ==================== Short Circuit ====================

#[tokio::test]
async fn test_transport_failure_skips_confirmation() {
    let mock = MockTransport::new();
    mock.push_error(
        methods::BROADCAST_TRANSACTION,
        SdkError::Transport("connection refused".to_string()),
    );
    let client = LedgerClient::with_transport(mock.clone());
    let wallet = Wallet::new_random();

    let mut controller =
        Controller::new(&client, Some(&wallet), unsigned(), Behavior::with_confirmation());
    let err = controller.execute().await.unwrap_err();

    assert!(matches!(err, SdkError::Transport(_)));
    assert_eq!(mock.call_count(methods::GET_TRANSACTION_INFO_BY_ID), 0);
    assert!(controller.result().is_none());
}

#[tokio::test]
async fn test_outcome_carries_placeholder_receipt() {
    let mock = MockTransport::new();
    mock.set_response(methods::BROADCAST_TRANSACTION, json!({"result": true}));
    let client = LedgerClient::with_transport(mock);
    let wallet = Wallet::new_random();

    let mut controller = Controller::new(&client, Some(&wallet), unsigned(), Behavior::default());
    controller.execute().await.unwrap();
    let outcome = controller.into_outcome();

    assert_eq!(outcome.receipt, Some(TransactionInfo::default()));
    assert!(outcome.result.unwrap().result);
    assert!(outcome.execution_error.is_none());
    assert!(outcome.transaction.is_signed());
}
