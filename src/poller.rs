//! Periodic REST pollers: the spot price source and the FX rate updater.
//!
//! Both fire immediately, then on a fixed interval, and additionally
//! whenever their [`Notify`] handle is poked by a "Refresh" action. A
//! failed fetch is logged and leaves the previous value in place; there is
//! no failure backoff.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::rest::CoinbaseClient;
use crate::tui::Message;

/// Spawns the polling price source for `pair`.
///
/// Each successful fetch is sent as [`Message::Price`]; each failure as
/// [`Message::PriceError`]. The task ends when the UI channel closes.
pub fn spawn_spot_poller(
    client: CoinbaseClient,
    pair: String,
    interval: Duration,
    refresh: Arc<Notify>,
    tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(pair, interval_secs = interval.as_secs(), "Starting spot price poller");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = refresh.notified() => {}
                () = tx.closed() => break,
            }

            let message = match client.spot_price(&pair).await {
                Ok(reading) => Message::Price(reading),
                Err(e) => {
                    warn!(pair, "Spot price fetch failed: {e}");
                    Message::PriceError(e.to_string())
                }
            };
            if tx.send(message).is_err() {
                break;
            }
        }
    })
}

/// Spawns the exchange-rate updater converting `base` into `quote`.
///
/// Each successful fetch is sent as [`Message::ExchangeRate`]. Failures are
/// only logged.
pub fn spawn_rate_updater(
    client: CoinbaseClient,
    base: String,
    quote: String,
    interval: Duration,
    refresh: Arc<Notify>,
    tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(base, quote, interval_secs = interval.as_secs(), "Starting exchange rate updater");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = refresh.notified() => {}
                () = tx.closed() => break,
            }

            match client.exchange_rate(&base, &quote).await {
                Ok(rate) => {
                    info!(base, quote, rate, "Updated exchange rate");
                    if tx.send(Message::ExchangeRate(rate)).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(base, quote, "Exchange rate fetch failed: {e}"),
            }
        }
    })
}
