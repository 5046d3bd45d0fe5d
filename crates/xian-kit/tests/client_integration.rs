//! End-to-end tests against a mocked masternode.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xian_kit::*;

fn client(server: &MockServer) -> Xian {
    Xian::new(NetworkSettings::new(
        "xian-test-1",
        NetworkType::Devnet,
        [server.uri()],
    ))
    .unwrap()
}

fn query_path(query: &str) -> String {
    format!("\"{}\"", query)
}

fn query_response(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": {
            "response": {
                "code": 0,
                "log": "",
                "info": "",
                "index": "0",
                "key": null,
                "value": value,
                "proofOps": null,
                "height": "1024",
                "codespace": ""
            }
        }
    }))
}

fn encoded(text: &str) -> serde_json::Value {
    json!(STANDARD.encode(text))
}

async fn mount_query(server: &MockServer, query: &str, value: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/abci_query"))
        .and(query_param("path", query_path(query)))
        .respond_with(query_response(value))
        .expect(1)
        .mount(server)
        .await;
}

fn transfer() -> Transaction {
    Transaction::new(
        TransactionPayload {
            chain_id: "xian-test-1".to_string(),
            contract: "currency".to_string(),
            function: "transfer".to_string(),
            kwargs: json!({ "to": "bob", "amount": 5 }),
            nonce: 3,
            sender: "alice".to_string(),
            stamps_supplied: 20,
        },
        "abcd",
    )
}

// ============================================================================
// Nonce
// ============================================================================

#[tokio::test]
async fn test_get_nonce_empty_sentinel_is_zero() {
    let server = MockServer::start().await;
    mount_query(&server, "/get_next_nonce/alice", json!("AA==")).await;

    let nonce = client(&server).get_nonce("alice").await.unwrap();
    assert_eq!(nonce, 0);
}

#[tokio::test]
async fn test_get_nonce_decodes_big_endian() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "/get_next_nonce/alice",
        json!(STANDARD.encode([0x01u8, 0x02])),
    )
    .await;

    let nonce = client(&server).get_nonce("alice").await.unwrap();
    assert_eq!(nonce, 258);
}

#[tokio::test]
async fn test_get_nonce_null_value_is_zero() {
    let server = MockServer::start().await;
    mount_query(&server, "/get_next_nonce/alice", json!(null)).await;

    assert_eq!(client(&server).get_nonce("alice").await.unwrap(), 0);
}

// ============================================================================
// Contract queries
// ============================================================================

#[tokio::test]
async fn test_get_contract_methods() {
    let server = MockServer::start().await;
    let methods = r#"[{"name":"transfer","arguments":[{"name":"amount","type":"float"},{"name":"to","type":"str"}]}]"#;
    mount_query(&server, "/contract_methods/currency", encoded(methods)).await;

    let result = client(&server)
        .get_contract_methods("currency")
        .await
        .unwrap();
    assert_eq!(result[0]["name"], "transfer");
    assert_eq!(result[0]["arguments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_contract_methods_absent_is_null() {
    let server = MockServer::start().await;
    mount_query(&server, "/contract_methods/missing", json!("AA==")).await;

    let result = client(&server)
        .get_contract_methods("missing")
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn test_get_contract_variables() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "/contract_vars/currency",
        encoded(r#"{"variables":[],"hashes":["balances","metadata"]}"#),
    )
    .await;

    let result = client(&server)
        .get_contract_variables("currency")
        .await
        .unwrap();
    assert_eq!(result["hashes"], json!(["balances", "metadata"]));
}

#[tokio::test]
async fn test_ping_server() {
    let server = MockServer::start().await;
    mount_query(&server, "/ping/", encoded(r#"{"status":"online"}"#)).await;

    let result = client(&server).ping_server().await.unwrap();
    assert_eq!(result["status"], "online");
}

#[tokio::test]
async fn test_get_contract_info_and_exists() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "/contract/currency",
        encoded("balances = Hash(default_value=0)"),
    )
    .await;
    mount_query(&server, "/contract/con_missing", json!("AA==")).await;

    let xian = client(&server);
    let info = xian.get_contract_info("currency").await.unwrap();
    assert_eq!(info.as_text(), Some("balances = Hash(default_value=0)"));

    assert!(!xian.contract_exists("con_missing").await.unwrap());
}

#[tokio::test]
async fn test_get_variable_absent() {
    let server = MockServer::start().await;
    mount_query(&server, "/get/currency.balances:nobody/", json!("AA==")).await;

    let value = client(&server)
        .get_variable("currency", "balances:nobody")
        .await
        .unwrap();
    assert_eq!(value, DecodedValue::Absent);
}

#[tokio::test]
async fn test_get_variable_keys_with_reserved_characters() {
    let server = MockServer::start().await;
    for (key, text) in [("a&b", "amp"), ("a+b", "plus"), ("a#b", "hash"), ("a b", "space")] {
        mount_query(&server, &format!("/get/con_x.{}/", key), encoded(text)).await;
    }

    let xian = client(&server);
    for (key, text) in [("a&b", "amp"), ("a+b", "plus"), ("a#b", "hash"), ("a b", "space")] {
        let value = xian.get_variable("con_x", key).await.unwrap();
        assert_eq!(value.as_text(), Some(text), "key {key:?}");
    }
}

#[tokio::test]
async fn test_query_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    mount_query(&server, "/contract_methods/currency", encoded("{not json")).await;

    let err = client(&server)
        .get_contract_methods("currency")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
}

// ============================================================================
// Balances
// ============================================================================

#[tokio::test]
async fn test_get_currency_balance_fixed() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "/get/currency.balances:alice/",
        encoded(r#"{"__fixed__":"100.5"}"#),
    )
    .await;

    let balance = client(&server)
        .get_currency_balance("alice")
        .await
        .unwrap();
    assert_eq!(balance, "100.5".parse::<BigNumber>().unwrap());
}

#[tokio::test]
async fn test_get_currency_balance_plain_integer() {
    let server = MockServer::start().await;
    mount_query(&server, "/get/currency.balances:alice/", encoded("1000")).await;

    let balance = client(&server)
        .get_currency_balance("alice")
        .await
        .unwrap();
    assert_eq!(balance, BigNumber::from(1000u64));
}

#[tokio::test]
async fn test_get_currency_balance_absent_is_zero() {
    let server = MockServer::start().await;
    mount_query(&server, "/get/currency.balances:nobody/", json!("AA==")).await;

    let balance = client(&server)
        .get_currency_balance("nobody")
        .await
        .unwrap();
    assert!(balance.is_zero());
}

// ============================================================================
// Broadcast
// ============================================================================

#[tokio::test]
async fn test_broadcast_tx_success() {
    let server = MockServer::start().await;
    let tx = transfer();
    let token = stringify_transaction(&tx).unwrap();

    Mock::given(method("GET"))
        .and(path("/broadcast_tx_commit"))
        .and(query_param("tx", format!("\"{}\"", token)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": -1,
            "result": {
                "check_tx": { "code": 0, "data": null, "log": "" },
                "tx_result": {
                    "code": 0,
                    "data": STANDARD.encode(r#"{"status":0,"result":"None","stamps_used":7}"#),
                    "log": ""
                },
                "hash": "A1B2C3",
                "height": "2048"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).broadcast_tx(&tx).await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.hash, "A1B2C3");
    assert_eq!(outcome.data.unwrap()["stamps_used"], 7);
}

#[tokio::test]
async fn test_broadcast_tx_deliver_failure_is_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broadcast_tx_commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": -1,
            "result": {
                "check_tx": { "code": 0 },
                "deliver_tx": { "code": 1, "log": "Transaction failed" },
                "hash": "DEAD",
                "height": "0"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).broadcast_tx(&transfer()).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.hash, "DEAD");
    assert_eq!(outcome.data, None);
    assert_eq!(
        outcome.failure,
        Some(BroadcastFailure::DeliverTx {
            code: 1,
            log: "Transaction failed".to_string()
        })
    );
}

#[tokio::test]
async fn test_broadcast_tx_rpc_error_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broadcast_tx_commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": -1,
            "error": {
                "code": -32603,
                "message": "Internal error",
                "data": "tx already exists in cache"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .broadcast_tx(&transfer())
        .await
        .unwrap_err();
    match err {
        Error::Rpc(RpcError::Rpc { code, data, .. }) => {
            assert_eq!(code, -32603);
            assert_eq!(data, Some(json!("tx already exists in cache")));
        }
        other => panic!("Expected RPC error, got {:?}", other),
    }
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_http_error_surfaced_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/abci_query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).get_nonce("alice").await.unwrap_err();
    match err {
        Error::Rpc(e) => {
            assert_eq!(e.status_code(), Some(503));
            assert!(e.to_string().contains("overloaded"));
        }
        other => panic!("Expected RPC error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_result_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/abci_query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": -1
        })))
        .mount(&server)
        .await;

    let err = client(&server).ping_server().await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_round_robin_spreads_requests_across_hosts() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        mount_query(server, "/ping/", encoded(r#"{"status":"online"}"#)).await;
    }

    let xian = Xian::builder(NetworkSettings::new(
        "xian-test-1",
        NetworkType::Devnet,
        [first.uri(), second.uri()],
    ))
    .selector(RoundRobinSelector::new())
    .build()
    .unwrap();

    xian.ping_server().await.unwrap();
    xian.ping_server().await.unwrap();
}

// ============================================================================
// Node information
// ============================================================================

#[tokio::test]
async fn test_get_node_info_passthrough() {
    let server = MockServer::start().await;
    let body = json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": { "node_info": { "network": "xian-test-1" }, "sync_info": { "latest_block_height": "42" } }
    });

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client(&server).get_node_info().await.unwrap(), body);
}

#[tokio::test]
async fn test_get_latest_block_passthrough() {
    let server = MockServer::start().await;
    let body = json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": { "block": { "header": { "height": "42" } } }
    });

    Mock::given(method("GET"))
        .and(path("/block"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let block = client(&server).get_latest_block().await.unwrap();
    assert_eq!(block["result"]["block"]["header"]["height"], "42");
}

#[tokio::test]
async fn test_get_transaction_prefixes_hash() {
    let server = MockServer::start().await;
    let body = json!({ "jsonrpc": "2.0", "id": -1, "result": { "hash": "A1B2C3" } });

    Mock::given(method("GET"))
        .and(path("/tx"))
        .and(query_param("hash", "\"0xA1B2C3\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(2)
        .mount(&server)
        .await;

    let xian = client(&server);
    assert_eq!(xian.get_transaction("A1B2C3").await.unwrap(), body);
    assert_eq!(xian.get_transaction("0xA1B2C3").await.unwrap(), body);
}
