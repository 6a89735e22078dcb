//! Async WebSocket client for the Coinbase exchange feed.
//!
//! This module is organized by concern:
//! - [`subscription`] - Channel subscribe operations
//! - [`handler`] - Incoming frame decoding
//! - [`connection`] - Connection lifecycle with reconnect and backoff

pub mod connection;
mod handler;
mod subscription;

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream};
use tracing::info;
use tungstenite::Message;

use crate::Result;

pub use connection::{Backoff, ConnectionEvent, ConnectionManager, ConnectionState};
pub use handler::{decode_frame, feed_event};
pub use subscription::subscribe;

/// Write half of a feed connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a feed connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// `wss://` URLs are secured with `tls_config`; plain `ws://` URLs skip TLS.
///
/// # Errors
///
/// Returns a [`BtcBarError`](crate::BtcBarError) if the connection or TLS handshake fails.
pub async fn connect(url: &str, tls_config: Arc<rustls::ClientConfig>) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = tokio_tungstenite::connect_async_tls_with_config(
        url,
        None,
        false,
        Some(Connector::Rustls(tls_config)),
    )
    .await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}
