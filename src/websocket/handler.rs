//! Incoming feed frame decoding.

use tracing::{debug, info, warn};

use crate::Result;
use crate::models::quote_currency;
use crate::models::ticker::FeedMessage;
use crate::rest::parse_amount;
use crate::state::PriceReading;
use crate::tui::Message;

/// Decodes one text frame into a [`FeedMessage`].
///
/// # Errors
///
/// Returns [`BtcBarError::MalformedMessage`](crate::BtcBarError::MalformedMessage)
/// if the frame is not JSON or has no recognisable `type`.
pub fn decode_frame(text: &str) -> Result<FeedMessage> {
    serde_json::from_str(text).map_err(|e| crate::BtcBarError::MalformedMessage(e.to_string()))
}

/// Maps a decoded frame to the UI message it produces, if any.
///
/// Only a ticker with a non-empty, numeric price yields a reading. Ticks
/// are not checked for sequence order.
pub fn feed_event(message: FeedMessage) -> Option<Message> {
    match message {
        FeedMessage::Ticker(ticker) => {
            if ticker.price.is_empty() {
                debug!(product_id = ticker.product_id, "Ticker without price, ignoring");
                return None;
            }

            match parse_amount(&ticker.price) {
                Ok(amount) => {
                    debug!(
                        product_id = ticker.product_id,
                        amount,
                        sequence = ?ticker.sequence,
                        "Received ticker"
                    );
                    let currency = quote_currency(&ticker.product_id);
                    Some(Message::Price(PriceReading::new(amount, currency)))
                }
                Err(e) => {
                    warn!(product_id = ticker.product_id, error = %e, "Unparseable ticker price");
                    None
                }
            }
        }
        FeedMessage::Subscriptions(subscriptions) => {
            for channel in &subscriptions.channels {
                info!(
                    channel = channel.name,
                    product_ids = ?channel.product_ids,
                    "Subscription confirmed"
                );
            }
            None
        }
        FeedMessage::Error(error) => {
            warn!(message = error.message, reason = error.reason, "Feed reported an error");
            let text = if error.reason.is_empty() {
                error.message
            } else {
                format!("{}: {}", error.message, error.reason)
            };
            Some(Message::FeedError(text))
        }
        FeedMessage::Other => None,
    }
}
