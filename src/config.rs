//! Application configuration loaded from environment variables.
//!
//! Every setting is optional:
//! - `BTCBAR_PRICE_SOURCE`: `stream` (default) or `poll`
//! - `BTCBAR_WEBSOCKET_URL`: streaming feed endpoint
//! - `BTCBAR_PRODUCT_ID`: product subscribed on the ticker channel
//! - `BTCBAR_REST_URL`: REST API base URL
//! - `BTCBAR_SPOT_PAIR`: pair polled in `poll` mode
//! - `BTCBAR_POLL_INTERVAL_SECS` / `BTCBAR_FX_INTERVAL_SECS`
//! - `BTCBAR_FX_BASE` / `BTCBAR_FX_QUOTE`: conversion currencies
//! - `BTCBAR_DATA_DIR`: directory for the holdings file and log
//! - `BTCBAR_CA_BUNDLE`: extra PEM roots to trust
//! - `BTCBAR_PROMPT`: `auto` (default), `native` or `terminal`

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default streaming feed endpoint.
const DEFAULT_WEBSOCKET_URL: &str = "wss://ws-feed.exchange.coinbase.com";

/// Default REST API base URL.
const DEFAULT_REST_URL: &str = "https://api.coinbase.com/v2";

const DEFAULT_PRODUCT_ID: &str = "BTC-USD";
const DEFAULT_SPOT_PAIR: &str = "BTC-CAD";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_FX_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_FX_BASE: &str = "USD";
const DEFAULT_FX_QUOTE: &str = "CAD";

/// Directory name used under the OS config directory.
const APP_DIR_NAME: &str = "btcbar";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub price: PriceConfig,
    pub fx: FxConfig,
    pub data_dir: PathBuf,
    pub ca_bundle: Option<PathBuf>,
    pub prompt: PromptMode,
}

/// Where prices come from and how often.
#[derive(Debug)]
pub struct PriceConfig {
    pub source: PriceSourceKind,
    pub websocket_url: String,
    pub product_id: String,
    pub rest_url: String,
    pub spot_pair: String,
    pub poll_interval: Duration,
}

/// Exchange-rate conversion settings.
#[derive(Debug)]
pub struct FxConfig {
    pub base: String,
    pub quote: String,
    pub interval: Duration,
}

/// Price source variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceSourceKind {
    /// Persistent ticker subscription.
    Stream,
    /// Periodic spot-price request.
    Poll,
}

impl FromStr for PriceSourceKind {
    type Err = crate::BtcBarError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            "poll" => Ok(Self::Poll),
            other => Err(crate::BtcBarError::Config(format!(
                "BTCBAR_PRICE_SOURCE must be `stream` or `poll`, got `{other}`"
            ))),
        }
    }
}

/// How holdings input is collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptMode {
    /// Native dialog when its helper is installed, terminal input otherwise.
    Auto,
    /// The platform's native dialog without checking for its helper;
    /// falls back to terminal input if it fails to launch.
    Native,
    /// Always use the in-terminal input field.
    Terminal,
}

impl FromStr for PromptMode {
    type Err = crate::BtcBarError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "native" => Ok(Self::Native),
            "terminal" => Ok(Self::Terminal),
            other => Err(crate::BtcBarError::Config(format!(
                "BTCBAR_PROMPT must be `auto`, `native` or `terminal`, got `{other}`"
            ))),
        }
    }
}

impl PriceConfig {
    /// Quote currency of the prices this source produces.
    pub fn quote_currency(&self) -> &str {
        let product = match self.source {
            PriceSourceKind::Stream => &self.product_id,
            PriceSourceKind::Poll => &self.spot_pair,
        };
        crate::models::quote_currency(product)
    }

    /// Base asset of the tracked product, e.g. `BTC`.
    pub fn base_asset(&self) -> &str {
        let product = match self.source {
            PriceSourceKind::Stream => &self.product_id,
            PriceSourceKind::Poll => &self.spot_pair,
        };
        crate::models::base_asset(product)
    }
}

impl AppConfig {
    /// Path of the log file inside the data directory.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("btcbar.log")
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`BtcBarError::Config`](crate::BtcBarError::Config) if a
/// variable is set to a value that cannot be parsed, or if no data
/// directory can be determined.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let source = non_empty_var("BTCBAR_PRICE_SOURCE")
        .map(|v| v.parse::<PriceSourceKind>())
        .transpose()?
        .unwrap_or(PriceSourceKind::Stream);

    let price = PriceConfig {
        source,
        websocket_url: var_or("BTCBAR_WEBSOCKET_URL", DEFAULT_WEBSOCKET_URL),
        product_id: var_or("BTCBAR_PRODUCT_ID", DEFAULT_PRODUCT_ID),
        rest_url: var_or("BTCBAR_REST_URL", DEFAULT_REST_URL)
            .trim_end_matches('/')
            .to_string(),
        spot_pair: var_or("BTCBAR_SPOT_PAIR", DEFAULT_SPOT_PAIR),
        poll_interval: secs_var("BTCBAR_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
    };

    let fx = FxConfig {
        base: var_or("BTCBAR_FX_BASE", DEFAULT_FX_BASE),
        quote: var_or("BTCBAR_FX_QUOTE", DEFAULT_FX_QUOTE),
        interval: secs_var("BTCBAR_FX_INTERVAL_SECS", DEFAULT_FX_INTERVAL_SECS)?,
    };

    let data_dir = match non_empty_var("BTCBAR_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                crate::BtcBarError::Config(
                    "no config directory found, set BTCBAR_DATA_DIR".to_string(),
                )
            })?,
    };

    let prompt = non_empty_var("BTCBAR_PROMPT")
        .map(|v| v.parse::<PromptMode>())
        .transpose()?
        .unwrap_or(PromptMode::Auto);

    Ok(AppConfig {
        price,
        fx,
        data_dir,
        ca_bundle: non_empty_var("BTCBAR_CA_BUNDLE").map(PathBuf::from),
        prompt,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    non_empty_var(name).unwrap_or_else(|| default.to_string())
}

/// Reads a positive number of seconds.
fn secs_var(name: &str, default: u64) -> crate::Result<Duration> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(crate::BtcBarError::Config(format!(
            "{name} must be a positive number of seconds, got `{raw}`"
        ))),
    }
}
