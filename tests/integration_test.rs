//! Real API integration tests against the public Coinbase endpoints.
//!
//! These tests require network access.
//! Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use std::time::Duration;

use futures_util::StreamExt;
use btcbar::models::Channel;
use btcbar::rest::CoinbaseClient;
use btcbar::websocket::{connect, subscribe};

use common::{COINBASE_REST_URL, COINBASE_WS_URL};

#[tokio::test]
async fn test_connect_to_coinbase_feed() {
    let result = connect(COINBASE_WS_URL, common::test_tls_config()).await;
    assert!(result.is_ok(), "Failed to connect to Coinbase feed");
}

#[tokio::test]
async fn test_subscribe_and_receive_ticker() {
    let (mut write, mut read) = connect(COINBASE_WS_URL, common::test_tls_config())
        .await
        .expect("Failed to connect");

    let products = vec!["BTC-USD".to_string()];
    subscribe(&mut write, &Channel::Ticker, &products)
        .await
        .expect("Failed to subscribe to ticker");

    let timeout = tokio::time::timeout(Duration::from_secs(30), async {
        while let Some(msg) = read.next().await {
            if let Ok(tungstenite::Message::Text(text)) = msg
                && text.contains("\"type\":\"ticker\"")
            {
                return true;
            }
        }
        false
    });

    let received = timeout.await.expect("Timeout waiting for ticker");
    assert!(received, "Did not receive a ticker frame");
}

#[tokio::test]
async fn test_spot_price() {
    let client = CoinbaseClient::new(COINBASE_REST_URL, common::test_tls_config())
        .expect("Failed to build client");

    let reading = client.spot_price("BTC-CAD").await.expect("Spot price failed");

    assert!(reading.amount > 0.0);
    assert_eq!(reading.currency, "CAD");
}

#[tokio::test]
async fn test_exchange_rate() {
    let client = CoinbaseClient::new(COINBASE_REST_URL, common::test_tls_config())
        .expect("Failed to build client");

    let rate = client
        .exchange_rate("USD", "CAD")
        .await
        .expect("Exchange rate failed");

    assert!(rate > 0.0);
}
