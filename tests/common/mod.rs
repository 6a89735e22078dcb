//! Shared test utilities and constants.

use std::sync::Arc;

/// Coinbase Exchange public feed URL.
pub const COINBASE_WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";

/// Coinbase public REST API base URL.
pub const COINBASE_REST_URL: &str = "https://api.coinbase.com/v2";

/// Builds a rustls TLS config trusting the bundled web PKI roots.
pub fn test_tls_config() -> Arc<rustls::ClientConfig> {
    Arc::new(btcbar::tls::build_tls_config(None).expect("failed to build TLS config"))
}
