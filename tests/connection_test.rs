//! Connection manager tests against a local WebSocket server.

mod common;

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tungstenite::Message as WsMessage;

use btcbar::tui::Message;
use btcbar::websocket::{Backoff, ConnectionManager, ConnectionState};

/// Fast reconnect policy so tests do not wait on real backoff delays.
fn fast_backoff() -> Backoff {
    Backoff::new(
        Duration::from_millis(10),
        Duration::from_millis(50),
        10,
        Duration::from_millis(100),
    )
}

/// Waits for the next message that is not a connection state change,
/// collecting state changes along the way.
async fn next_non_state(
    rx: &mut mpsc::UnboundedReceiver<Message>,
    states: &mut Vec<ConnectionState>,
) -> Message {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("Timeout waiting for message")
            .expect("Channel closed");
        match message {
            Message::Connection(state) => states.push(state),
            other => return other,
        }
    }
}

/// Waits until the manager reports `wanted`.
async fn wait_for_state(rx: &mut mpsc::UnboundedReceiver<Message>, wanted: ConnectionState) {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("Timeout waiting for state")
            .expect("Channel closed");
        if let Message::Connection(state) = message
            && state == wanted
        {
            return;
        }
    }
}

#[tokio::test]
async fn test_subscribes_and_forwards_prices() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let subscribe = match ws.next().await {
            Some(Ok(WsMessage::Text(text))) => text.as_str().to_string(),
            other => panic!("expected subscribe frame, got {other:?}"),
        };

        ws.send(WsMessage::Text(
            r#"{"type":"subscriptions","channels":[{"name":"ticker","product_ids":["BTC-USD"]}]}"#.into(),
        ))
        .await
        .unwrap();
        ws.send(WsMessage::Text(
            r#"{"type":"ticker","product_id":"BTC-USD","price":""}"#.into(),
        ))
        .await
        .unwrap();
        ws.send(WsMessage::Text(
            r#"{"type":"ticker","product_id":"BTC-USD","price":"64000.50"}"#.into(),
        ))
        .await
        .unwrap();

        // Keep the socket open until the client is done.
        while ws.next().await.is_some() {}
        subscribe
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        url,
        vec!["BTC-USD".to_string()],
        common::test_tls_config(),
        tx,
    )
    .with_backoff(fast_backoff());
    let client = tokio::spawn(manager.run());

    let mut states = Vec::new();
    match next_non_state(&mut rx, &mut states).await {
        Message::Price(reading) => {
            assert_eq!(reading.amount, 64000.50);
            assert_eq!(reading.currency, "USD");
        }
        other => panic!("expected a price, got {other:?}"),
    }
    assert_eq!(
        states,
        vec![ConnectionState::Connecting, ConnectionState::Subscribed]
    );

    // Dropping the receiver stops the manager.
    drop(rx);
    tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .expect("manager did not stop")
        .unwrap();

    let subscribe = server.await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&subscribe).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "type": "subscribe",
            "channels": [{ "name": "ticker", "product_ids": ["BTC-USD"] }]
        })
    );
}

#[tokio::test]
async fn test_reconnects_after_server_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        // First connection: subscribe, then close immediately.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let _ = ws.next().await;
        let _ = ws.close(None).await;

        // Second connection: serve one price.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let _ = ws.next().await;
        ws.send(WsMessage::Text(
            r#"{"type":"ticker","product_id":"BTC-USD","price":"65000"}"#.into(),
        ))
        .await
        .unwrap();
        while ws.next().await.is_some() {}
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        url,
        vec!["BTC-USD".to_string()],
        common::test_tls_config(),
        tx,
    )
    .with_backoff(fast_backoff());
    let client = tokio::spawn(manager.run());

    let mut states = Vec::new();
    match next_non_state(&mut rx, &mut states).await {
        Message::Price(reading) => assert_eq!(reading.amount, 65000.0),
        other => panic!("expected a price, got {other:?}"),
    }
    assert_eq!(
        states,
        vec![
            ConnectionState::Connecting,
            ConnectionState::Subscribed,
            ConnectionState::Backoff,
            ConnectionState::Connecting,
            ConnectionState::Subscribed,
        ]
    );

    drop(rx);
    tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .expect("manager did not stop")
        .unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_stale_feed_triggers_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        // Accept connections and never send a frame.
        let mut sockets = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            if let Ok(ws) = accept_async(stream).await {
                sockets.push(ws);
            }
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        url,
        vec!["BTC-USD".to_string()],
        common::test_tls_config(),
        tx,
    )
    .with_backoff(fast_backoff())
    .with_stale_timeout(Duration::from_millis(100));
    tokio::spawn(manager.run());

    wait_for_state(&mut rx, ConnectionState::Subscribed).await;
    wait_for_state(&mut rx, ConnectionState::Backoff).await;
    wait_for_state(&mut rx, ConnectionState::Subscribed).await;
}

#[tokio::test]
async fn test_refused_connection_backs_off_and_retries() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        url,
        vec!["BTC-USD".to_string()],
        common::test_tls_config(),
        tx,
    )
    .with_backoff(fast_backoff());
    tokio::spawn(manager.run());

    wait_for_state(&mut rx, ConnectionState::Connecting).await;
    wait_for_state(&mut rx, ConnectionState::Backoff).await;
    wait_for_state(&mut rx, ConnectionState::Connecting).await;
}

#[tokio::test]
async fn test_backoff_grows_when_server_hangs_up_after_subscribe() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (accepted_tx, mut accepted_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        // Accept the subscription, then hang up without sending a frame.
        while let Ok((stream, _)) = listener.accept().await {
            let _ = accepted_tx.send(Instant::now());
            if let Ok(mut ws) = accept_async(stream).await {
                let _ = ws.next().await;
                let _ = ws.close(None).await;
            }
        }
    });

    let (tx, _rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        url,
        vec!["BTC-USD".to_string()],
        common::test_tls_config(),
        tx,
    )
    .with_backoff(Backoff::new(
        Duration::from_millis(40),
        Duration::from_secs(2),
        10,
        Duration::from_secs(2),
    ));
    tokio::spawn(manager.run());

    let mut accepted = Vec::new();
    for _ in 0..4 {
        let at = tokio::time::timeout(Duration::from_secs(5), accepted_rx.recv())
            .await
            .expect("Timeout waiting for reconnect")
            .expect("Server stopped");
        accepted.push(at);
    }

    // Delays of 40, 80 and 160 ms; a reset per subscribe would keep every gap near 40 ms.
    let last_gap = accepted[3] - accepted[2];
    assert!(
        last_gap >= Duration::from_millis(150),
        "backoff did not grow: last gap {last_gap:?}"
    );
}
