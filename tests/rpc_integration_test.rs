use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use token_wallet::{
    BalanceCache, BalanceStore, EventBus, HttpProvider, MemoryStore, Provider, ProviderError,
    RefreshErrorKind, TokenAmount, TransferClient, WalletConfigBuilder, WalletSession,
};

const TOKEN: &str = "0x2222222222222222222222222222222222222222";
const ACCOUNT: &str = "0x3333333333333333333333333333333333333333";
const RECIPIENT: &str = "0x4444444444444444444444444444444444444444";

fn amount(s: &str) -> TokenAmount {
    s.parse().unwrap()
}

fn word(s: &str) -> String {
    format!("0x{:064x}", amount(s).base_units())
}

/// Mounts an `eth_call` mock answering every balance query with the given
/// amount.
async fn mock_balance(mock_server: &MockServer, balance: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains("eth_call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": word(balance),
            "id": 1
        })))
        .mount(mock_server)
        .await;
}

fn full_stack(rpc_url: String) -> (Arc<BalanceCache>, TransferClient) {
    let config = WalletConfigBuilder::new()
        .with_token(TOKEN)
        .with_refresh_timeout(5)
        .with_submit_timeout(5)
        .build()
        .unwrap();
    let provider = Arc::new(HttpProvider::new(rpc_url));
    let session = WalletSession::connected(ACCOUNT.parse().unwrap(), provider);
    let store = BalanceStore::new(Arc::new(MemoryStore::new()), config.balance_key.clone());
    let cache = Arc::new(BalanceCache::new(
        config,
        store,
        Arc::new(EventBus::new()),
        session,
    ));
    let transfers = TransferClient::new(cache.clone());
    (cache, transfers)
}

#[tokio::test]
async fn refresh_over_http_adopts_chain_balance() {
    let mock_server = MockServer::start().await;
    mock_balance(&mock_server, "100.50").await;

    let (cache, _transfers) = full_stack(mock_server.uri());

    let refreshed = cache.refresh().await.unwrap();
    assert_eq!(refreshed, amount("100.50"));
    assert_eq!(cache.current(), amount("100.50"));
}

#[tokio::test]
async fn send_over_http_submits_and_decrements() {
    let mock_server = MockServer::start().await;
    mock_balance(&mock_server, "100.00").await;

    let tx_hash = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
    Mock::given(method("POST"))
        .and(body_string_contains("eth_sendTransaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": tx_hash,
            "id": 1
        })))
        .mount(&mock_server)
        .await;

    let (cache, transfers) = full_stack(mock_server.uri());
    cache.refresh().await.unwrap();

    let receipt = transfers
        .send(RECIPIENT, amount("40.00"), "lunch")
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id, tx_hash);
    assert_eq!(cache.current(), amount("60.00"));
}

#[tokio::test]
async fn rpc_error_surfaces_as_refresh_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "error": { "code": -32000, "message": "execution reverted" },
            "id": 1
        })))
        .mount(&mock_server)
        .await;

    let (cache, _transfers) = full_stack(mock_server.uri());

    let err = cache.refresh().await.unwrap_err();
    assert!(matches!(
        err.kind,
        RefreshErrorKind::Provider(ProviderError::Rpc { code: -32000, .. })
    ));
    assert_eq!(cache.current(), TokenAmount::ZERO);
}

#[tokio::test]
async fn non_string_result_is_an_invalid_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": { "unexpected": "object" },
            "id": 1
        })))
        .mount(&mock_server)
        .await;

    let provider = HttpProvider::new(mock_server.uri());
    let err = provider
        .request("eth_call", json!([]))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn http_failure_is_a_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let provider = HttpProvider::new(mock_server.uri());
    let err = provider
        .request("eth_call", json!([]))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
}
