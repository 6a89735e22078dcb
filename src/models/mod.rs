//! Wire models for the Coinbase exchange feed and REST API.
//!
//! Contains channel definitions and the subscription request sent on the
//! feed, plus helpers for splitting product identifiers.

pub mod rest;
pub mod ticker;

use serde::Serialize;

/// Feed channels this client knows how to subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Real-time price updates on every match.
    Ticker,
}

impl Channel {
    /// Returns the wire-format channel name expected by the feed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Ticker => "ticker",
        }
    }
}

/// A `subscribe` request sent to the feed.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub tpe: String,
    pub channels: Vec<ChannelSubscription>,
}

/// One channel and the products requested on it.
#[derive(Debug, Serialize)]
pub struct ChannelSubscription {
    pub name: String,
    pub product_ids: Vec<String>,
}

impl SubscribeRequest {
    /// Creates a request subscribing `product_ids` to a single channel.
    pub fn new(channel: &Channel, product_ids: &[String]) -> Self {
        Self {
            tpe: "subscribe".to_string(),
            channels: vec![ChannelSubscription {
                name: channel.as_str().to_string(),
                product_ids: product_ids.to_vec(),
            }],
        }
    }
}

/// Quote currency of a product id such as `BTC-USD`.
///
/// Ids without a separator are returned unchanged.
pub fn quote_currency(product_id: &str) -> &str {
    product_id
        .split_once('-')
        .map_or(product_id, |(_, quote)| quote)
}

/// Base asset of a product id such as `BTC-USD`.
pub fn base_asset(product_id: &str) -> &str {
    product_id
        .split_once('-')
        .map_or(product_id, |(base, _)| base)
}
