//! Decoding tests for feed frames and REST payloads.

use btcbar::models::rest::{ExchangeRatesResponse, SpotPriceResponse};
use btcbar::models::ticker::FeedMessage;
use btcbar::tui::Message;
use btcbar::websocket::{decode_frame, feed_event};

#[test]
fn deserialize_ticker_frame() {
    let json = r#"{
        "type": "ticker",
        "sequence": 72473850214,
        "product_id": "BTC-USD",
        "price": "67012.34",
        "open_24h": "66000.00",
        "volume_24h": "10234.12",
        "best_bid": "67012.33",
        "best_ask": "67012.34",
        "side": "buy",
        "time": "2024-05-01T12:00:00.000000Z",
        "trade_id": 12345,
        "last_size": "0.001"
    }"#;

    let FeedMessage::Ticker(tick) = decode_frame(json).unwrap() else {
        panic!("expected a ticker frame");
    };

    assert_eq!(tick.product_id, "BTC-USD");
    assert_eq!(tick.price, "67012.34");
    assert_eq!(tick.sequence, Some(72473850214));
}

#[test]
fn ticker_frame_becomes_price_reading() {
    let json = r#"{"type":"ticker","product_id":"BTC-USD","price":"67012.34"}"#;

    let message = feed_event(decode_frame(json).unwrap());

    match message {
        Some(Message::Price(reading)) => {
            assert_eq!(reading.amount, 67012.34);
            assert_eq!(reading.currency, "USD");
        }
        other => panic!("expected a price message, got {other:?}"),
    }
}

#[test]
fn ticker_without_price_is_ignored() {
    let json = r#"{"type":"ticker","product_id":"BTC-USD","price":""}"#;
    assert!(feed_event(decode_frame(json).unwrap()).is_none());

    let json = r#"{"type":"ticker","product_id":"BTC-USD"}"#;
    assert!(feed_event(decode_frame(json).unwrap()).is_none());
}

#[test]
fn ticker_with_garbage_price_is_ignored() {
    let json = r#"{"type":"ticker","product_id":"BTC-USD","price":"n/a"}"#;
    assert!(feed_event(decode_frame(json).unwrap()).is_none());
}

#[test]
fn subscriptions_and_heartbeats_produce_nothing() {
    let subscriptions = r#"{
        "type": "subscriptions",
        "channels": [{ "name": "ticker", "product_ids": ["BTC-USD"] }]
    }"#;
    assert!(matches!(
        decode_frame(subscriptions).unwrap(),
        FeedMessage::Subscriptions(_)
    ));
    assert!(feed_event(decode_frame(subscriptions).unwrap()).is_none());

    let heartbeat = r#"{"type":"heartbeat","sequence":1,"last_trade_id":2,"product_id":"BTC-USD"}"#;
    assert!(matches!(decode_frame(heartbeat).unwrap(), FeedMessage::Other));
    assert!(feed_event(decode_frame(heartbeat).unwrap()).is_none());
}

#[test]
fn error_frame_surfaces_message_and_reason() {
    let json = r#"{"type":"error","message":"Failed to subscribe","reason":"BTC-XYZ is not a valid product"}"#;

    let message = feed_event(decode_frame(json).unwrap());

    match message {
        Some(Message::FeedError(text)) => {
            assert_eq!(text, "Failed to subscribe: BTC-XYZ is not a valid product");
        }
        other => panic!("expected a feed error, got {other:?}"),
    }
}

#[test]
fn malformed_frames_are_errors() {
    assert!(decode_frame("not json").is_err());
    assert!(decode_frame(r#"{"product_id":"BTC-USD"}"#).is_err());
}

#[test]
fn deserialize_spot_price_response() {
    let json = r#"{"data":{"amount":"91234.56","base":"BTC","currency":"CAD"}}"#;

    let response: SpotPriceResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.data.amount, "91234.56");
    assert_eq!(response.data.currency.as_deref(), Some("CAD"));
}

#[test]
fn deserialize_exchange_rates_response() {
    let json = r#"{"data":{"currency":"USD","rates":{"CAD":"1.3612","EUR":"0.92"}}}"#;

    let response: ExchangeRatesResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.data.currency, "USD");
    assert_eq!(response.data.rates.get("CAD").map(String::as_str), Some("1.3612"));
}
