//! Channel subscription operations.

use futures_util::SinkExt;
use tracing::{debug, info};
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::models::{Channel, SubscribeRequest};

/// Subscribes `product_ids` to a channel with a single subscribe frame.
///
/// # Errors
///
/// Returns a [`BtcBarError`](crate::BtcBarError) if sending the subscription message fails.
pub async fn subscribe(write: &mut WsWriter, channel: &Channel, product_ids: &[String]) -> Result<()> {
    let request = SubscribeRequest::new(channel, product_ids);
    let json = serde_json::to_string(&request)?;
    debug!("Sending subscribe request: {}", json);
    write.send(Message::Text(json.into())).await?;
    info!(
        channel = channel.as_str(),
        ?product_ids,
        "Subscribed to channel"
    );

    Ok(())
}
