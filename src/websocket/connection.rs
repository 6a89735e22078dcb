//! Feed connection lifecycle management.
//!
//! [`ConnectionManager`] connects, subscribes, reads frames, and
//! reconnects with exponential backoff whenever the connection fails.
//! After too many consecutive failures it pauses for a cooldown instead
//! of hammering the endpoint. It never terminates the process; it only
//! stops once the UI side of its channel is gone.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tungstenite::Message as WsMessage;

use super::{WsReader, WsWriter, connect, decode_frame, feed_event, subscribe};
use crate::models::Channel;
use crate::tui::Message;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Consecutive failures that open the circuit.
const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// Pause once the circuit is open.
const CIRCUIT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// A subscribed feed silent for this long is considered dead.
const STALE_FEED_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection states reported to the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Subscribed,
    Backoff,
}

/// Inputs to the connection state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A dial attempt starts (first connect or backoff elapsed).
    Dial,
    /// Dial and subscribe both succeeded.
    Subscribed,
    /// Dial, subscribe or read failed.
    Failed,
    /// The manager is stopping.
    Shutdown,
}

impl ConnectionState {
    /// Returns the state reached from `self` on `event`.
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn on(self, event: ConnectionEvent) -> ConnectionState {
        use ConnectionEvent as E;
        use ConnectionState as S;

        match (self, event) {
            (_, E::Shutdown) => S::Disconnected,
            (S::Disconnected | S::Backoff, E::Dial) => S::Connecting,
            (S::Connecting, E::Subscribed) => S::Subscribed,
            (S::Connecting | S::Subscribed, E::Failed) => S::Backoff,
            (state, _) => state,
        }
    }

    /// Returns a display string for the state.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Offline",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Subscribed => "Live",
            ConnectionState::Backoff => "Reconnecting...",
        }
    }
}

/// Exponential reconnect delay with a consecutive-failure circuit breaker.
#[derive(Clone, Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    max_failures: u32,
    cooldown: Duration,
    current: Duration,
    failures: u32,
}

impl Backoff {
    /// Creates a policy doubling from `initial` up to `max`, pausing for
    /// `cooldown` once `max_failures` attempts in a row have failed.
    pub fn new(initial: Duration, max: Duration, max_failures: u32, cooldown: Duration) -> Self {
        Self {
            initial,
            max,
            max_failures: max_failures.max(1),
            cooldown,
            current: initial,
            failures: 0,
        }
    }

    /// Records a failure and returns how long to wait before the next dial.
    pub fn next_delay(&mut self) -> Duration {
        self.failures += 1;

        if self.failures >= self.max_failures {
            warn!(
                failures = self.failures,
                cooldown_secs = self.cooldown.as_secs(),
                "Too many consecutive failures, pausing reconnects"
            );
            self.failures = 0;
            self.current = self.initial;
            return self.cooldown;
        }

        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    /// Clears the failure count after a successful connection.
    pub fn reset(&mut self) {
        self.failures = 0;
        self.current = self.initial;
    }

    /// Consecutive failures since the last reset or cooldown.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(
            INITIAL_BACKOFF,
            MAX_BACKOFF,
            MAX_CONSECUTIVE_FAILURES,
            CIRCUIT_COOLDOWN,
        )
    }
}

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost, errored or went stale.
    ConnectionError,
    /// The message channel to the UI was closed (app shutting down).
    Shutdown,
}

/// Owns the feed connection and forwards accepted ticks to the UI.
pub struct ConnectionManager {
    url: String,
    product_ids: Vec<String>,
    tls_config: Arc<rustls::ClientConfig>,
    tx: mpsc::UnboundedSender<Message>,
    state: ConnectionState,
    backoff: Backoff,
    stale_timeout: Duration,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    #[must_use]
    pub fn new(
        url: String,
        product_ids: Vec<String>,
        tls_config: Arc<rustls::ClientConfig>,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            url,
            product_ids,
            tls_config,
            tx,
            state: ConnectionState::Disconnected,
            backoff: Backoff::default(),
            stale_timeout: STALE_FEED_TIMEOUT,
        }
    }

    /// Replaces the reconnect policy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replaces the silence timeout after which the feed is reconnected.
    #[must_use]
    pub fn with_stale_timeout(mut self, timeout: Duration) -> Self {
        self.stale_timeout = timeout;
        self
    }

    /// Applies `event` and reports a changed state to the UI.
    ///
    /// Returns `false` once the UI has gone away.
    fn transition(&mut self, event: ConnectionEvent) -> bool {
        let next = self.state.on(event);
        if next == self.state {
            return !self.tx.is_closed();
        }

        debug!(from = ?self.state, to = ?next, ?event, "Connection state change");
        self.state = next;
        self.tx.send(Message::Connection(next)).is_ok()
    }

    /// Dials the feed and sends the ticker subscription.
    async fn connect_and_subscribe(&self) -> crate::Result<(WsWriter, WsReader)> {
        let (mut write, read) = connect(&self.url, self.tls_config.clone()).await?;
        subscribe(&mut write, &Channel::Ticker, &self.product_ids).await?;
        Ok((write, read))
    }

    /// Runs the connection manager loop until the UI shuts down.
    ///
    /// Connects, subscribes, reads frames, and on any failure backs off
    /// before dialing again.
    pub async fn run(mut self) {
        loop {
            if !self.transition(ConnectionEvent::Dial) {
                break;
            }

            info!(url = %self.url, "Connecting to feed");
            match self.connect_and_subscribe().await {
                Ok((_write, read)) => {
                    if !self.transition(ConnectionEvent::Subscribed) {
                        break;
                    }
                    info!("Feed connected and subscribed");

                    if let DisconnectReason::Shutdown = self.read_loop(read).await {
                        break;
                    }
                }
                Err(e) => {
                    error!("Feed connection failed: {e}");
                }
            }

            if !self.transition(ConnectionEvent::Failed) {
                break;
            }

            let delay = self.backoff.next_delay();
            info!(
                backoff_ms = delay.as_millis() as u64,
                failures = self.backoff.failures(),
                "Backing off before reconnect"
            );
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.tx.closed() => break,
            }
        }

        self.state = self.state.on(ConnectionEvent::Shutdown);
        info!("Connection manager shutting down");
    }

    /// Reads frames until disconnection, silence, or shutdown.
    ///
    /// The backoff is reset on the first text frame, so a server that
    /// accepts the subscription and then hangs up keeps backing off.
    async fn read_loop(&mut self, mut read: WsReader) -> DisconnectReason {
        let mut delivered = false;
        loop {
            let next = tokio::select! {
                () = self.tx.closed() => return DisconnectReason::Shutdown,
                next = tokio::time::timeout(self.stale_timeout, read.next()) => next,
            };

            match next {
                Ok(Some(Ok(WsMessage::Text(text)))) => {
                    if !delivered {
                        delivered = true;
                        self.backoff.reset();
                    }
                    match decode_frame(&text) {
                        Ok(frame) => {
                            if let Some(message) = feed_event(frame)
                                && self.tx.send(message).is_err()
                            {
                                return DisconnectReason::Shutdown;
                            }
                        }
                        Err(e) => warn!("Skipping undecodable frame: {e}"),
                    }
                }
                Ok(Some(Ok(WsMessage::Close(frame)))) => {
                    warn!(?frame, "Feed closed by server");
                    return DisconnectReason::ConnectionError;
                }
                Ok(Some(Ok(_))) => {} // Binary/Ping/Pong frames
                Ok(Some(Err(e))) => {
                    warn!("WebSocket error: {e}");
                    return DisconnectReason::ConnectionError;
                }
                Ok(None) => {
                    warn!("WebSocket stream ended");
                    return DisconnectReason::ConnectionError;
                }
                Err(_) => {
                    warn!(
                        timeout_secs = self.stale_timeout.as_secs(),
                        "No frames received, treating feed as stale"
                    );
                    return DisconnectReason::ConnectionError;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_cap() {
        let mut backoff = Backoff::default();
        let delays: Vec<u64> = (0..9).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 60, 60, 60]);
    }

    #[test]
    fn circuit_opens_after_max_failures() {
        let mut backoff = Backoff::default();
        for _ in 0..9 {
            backoff.next_delay();
        }
        assert_eq!(backoff.next_delay(), CIRCUIT_COOLDOWN);
        assert_eq!(backoff.failures(), 0);
        assert_eq!(backoff.next_delay(), INITIAL_BACKOFF);
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut backoff = Backoff::default();
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.failures(), 0);
        assert_eq!(backoff.next_delay(), INITIAL_BACKOFF);
    }

    #[test]
    fn state_machine_happy_path_and_recovery() {
        use ConnectionEvent as E;
        use ConnectionState as S;

        let state = S::Disconnected.on(E::Dial);
        assert_eq!(state, S::Connecting);
        let state = state.on(E::Subscribed);
        assert_eq!(state, S::Subscribed);
        let state = state.on(E::Failed);
        assert_eq!(state, S::Backoff);
        let state = state.on(E::Dial);
        assert_eq!(state, S::Connecting);
        assert_eq!(state.on(E::Failed), S::Backoff);
    }

    #[test]
    fn irrelevant_events_leave_state_unchanged() {
        use ConnectionEvent as E;
        use ConnectionState as S;

        assert_eq!(S::Disconnected.on(E::Subscribed), S::Disconnected);
        assert_eq!(S::Subscribed.on(E::Dial), S::Subscribed);
        assert_eq!(S::Backoff.on(E::Failed), S::Backoff);
        assert_eq!(S::Subscribed.on(E::Shutdown), S::Disconnected);
    }
}
