use serde::Deserialize;

/// A frame received on the feed, discriminated by its `type` field.
///
/// Only the variants this client acts on carry data; everything else
/// (heartbeats, status, ...) decodes as [`FeedMessage::Other`].
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    Ticker(TickerData),
    Subscriptions(SubscriptionsData),
    Error(FeedError),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct TickerData {
    pub product_id: String,
    /// Last trade price as a decimal string. May be empty.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sequence: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionsData {
    pub channels: Vec<SubscribedChannel>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribedChannel {
    pub name: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedError {
    pub message: String,
    #[serde(default)]
    pub reason: String,
}
