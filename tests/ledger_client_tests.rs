use httpmock::prelude::*;
use serde_json::json;

use eth_gateway::error::LedgerError;
use eth_gateway::ledger::{LedgerClient, LogQuery, NativeTransfer, RemoteLedger};

fn ok(result: serde_json::Value) -> serde_json::Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

fn err(code: i64, message: &str) -> serde_json::Value {
    json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": message}})
}

#[tokio::test]
async fn test_request_shape_and_result() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .json_body_partial(r#"{"jsonrpc":"2.0","method":"getBalance","params":{"address":"kto-alice"}}"#);
            then.status(200).json_body(ok(json!(42)));
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/"));
    assert_eq!(ledger.balance("kto-alice").await.unwrap(), 42);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_codes_map_to_ledger_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(r#"{"method":"getNativeAddress"}"#);
            then.status(200).json_body(err(-32001, "NotExist"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(r#"{"method":"getCode"}"#);
            then.status(200).json_body(err(-32602, "bad address"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(r#"{"method":"getMaxBlockNumber"}"#);
            then.status(200).json_body(err(-32000, "database closed"));
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/"));
    assert_eq!(
        ledger.native_address("0x11").await,
        Err(LedgerError::NotFound("NotExist".into()))
    );
    assert_eq!(
        ledger.code("zz").await,
        Err(LedgerError::Invalid("bad address".into()))
    );
    assert_eq!(
        ledger.max_block_height().await,
        Err(LedgerError::Internal("database closed".into()))
    );
}

#[tokio::test]
async fn test_http_failure_is_internal() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(502).body("bad gateway");
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/"));
    assert!(matches!(
        ledger.block_by_number(1).await,
        Err(LedgerError::Internal(_))
    ));
}

#[tokio::test]
async fn test_block_and_transaction_decoding() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .json_body_partial(r#"{"method":"getBlockByNumber","params":{"height":3}}"#);
            then.status(200).json_body(ok(json!({
                "hash": "ab",
                "prevHash": "cd",
                "height": 3,
                "timestamp": 1700000000u64
            })));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(r#"{"method":"getTransactionByHash"}"#);
            then.status(200).json_body(ok(json!({
                "hash": "ee",
                "blockNumber": 3,
                "ethFrom": "0x11",
                "ethTo": "0x22",
                "amount": 5,
                "evm": {"operation": "call", "contractAddress": "0x33", "status": true, "input": "abcd"}
            })));
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/"));
    let block = ledger.block_by_number(3).await.unwrap();
    assert_eq!(block.prev_hash, "cd");
    assert_eq!(block.timestamp, 1_700_000_000);

    let tx = ledger.transaction_by_hash("ee").await.unwrap();
    assert_eq!(tx.amount, 5);
    let evm = tx.evm.unwrap();
    assert!(!evm.is_create());
    assert!(evm.status);
}

#[tokio::test]
async fn test_malformed_logs_are_skipped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(
                r#"{"method":"getLogs","params":{"address":"0x33","fromBlock":1,"toBlock":9}}"#,
            );
            then.status(200).json_body(ok(json!([
                {
                    "address": "0x3333333333333333333333333333333333333333",
                    "topics": [],
                    "data": "0x",
                    "blockNumber": "0x2"
                },
                {"address": "not an address"}
            ])));
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/"));
    let query = LogQuery {
        address: "0x33".into(),
        from_block: 1,
        to_block: 9,
        ..Default::default()
    };
    let logs = ledger.logs(&query).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].block_number.as_u64(), 2);
}

#[tokio::test]
async fn test_send_transaction_carries_signer_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(
                r#"{"method":"sendTransaction","params":{"from":"a","to":"b","amount":9,"nonce":2,"signerKey":"k"}}"#,
            );
            then.status(200).json_body(ok(json!("feed")));
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/")).with_signer_key(Some("k".into()));
    let transfer = NativeTransfer {
        from: "a".into(),
        to: "b".into(),
        amount: 9,
        nonce: 2,
    };
    assert_eq!(ledger.send_transaction(&transfer).await.unwrap(), "feed");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_contract_transaction_carries_relay() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(
                r#"{"method":"sendEthSignedContractTransaction","params":{"from":"0xAb","rawTransaction":"0x02","relay":"relay-1"}}"#,
            );
            then.status(200).json_body(ok(json!("beef")));
        })
        .await;

    let ledger = RemoteLedger::new(&server.url("/")).with_contract_relay("relay-1");
    assert_eq!(
        ledger
            .send_raw_contract_transaction("0xAb", "0x02")
            .await
            .unwrap(),
        "beef"
    );
    mock.assert_async().await;
}
