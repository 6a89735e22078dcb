//! Crate-level error types.
//!
//! [`BtcBarError`] unifies every error source (configuration, WebSocket,
//! HTTP, JSON, TLS, filesystem, dialogs) behind a single enum so callers can match
//! on the variant they care about while still using the `?` operator.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BtcBarError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum BtcBarError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request to the REST API failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The TLS client configuration could not be built.
    #[error("tls error: {0}")]
    Tls(String),

    /// Terminal or filesystem I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// A native dialog helper could not be launched.
    #[error("prompt unavailable: {0}")]
    Prompt(String),

    /// A message from the exchange did not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}

impl From<std::io::Error> for BtcBarError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
