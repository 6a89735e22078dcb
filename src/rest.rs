//! Coinbase public REST API client.
//!
//! Two unauthenticated endpoints are used: the spot price of a pair and the
//! exchange-rate table for a base currency.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::Result;
use crate::models::quote_currency;
use crate::models::rest::{ExchangeRatesData, ExchangeRatesResponse, SpotPriceResponse};
use crate::state::PriceReading;

/// Request timeout for every REST call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin wrapper over a [`reqwest::Client`] pointed at one API base URL.
#[derive(Clone, Debug)]
pub struct CoinbaseClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinbaseClient {
    /// Creates a client for `base_url` (e.g. `https://api.coinbase.com/v2`).
    ///
    /// # Errors
    ///
    /// Returns [`BtcBarError::Tls`](crate::BtcBarError::Tls) if the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, tls_config: Arc<rustls::ClientConfig>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_preconfigured_tls((*tls_config).clone())
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("btcbar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::BtcBarError::Tls(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the current spot price of `pair` (e.g. `BTC-CAD`).
    ///
    /// # Errors
    ///
    /// Returns a [`BtcBarError`](crate::BtcBarError) if the request fails,
    /// the status is not a success, or the amount is not a number.
    pub async fn spot_price(&self, pair: &str) -> Result<PriceReading> {
        let url = format!("{}/prices/{pair}/spot", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: SpotPriceResponse = response.json().await?;
        debug!(pair, amount = %body.data.amount, "Fetched spot price");

        spot_reading(pair, body)
    }

    /// Fetches how many units of `quote` one unit of `base` buys.
    ///
    /// # Errors
    ///
    /// Returns a [`BtcBarError`](crate::BtcBarError) if the request fails,
    /// or `quote` is missing from the rate table or not a number.
    pub async fn exchange_rate(&self, base: &str, quote: &str) -> Result<f64> {
        let url = format!("{}/exchange-rates", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("currency", base)])
            .send()
            .await?
            .error_for_status()?;
        let body: ExchangeRatesResponse = response.json().await?;
        debug!(base, quote, currencies = body.data.rates.len(), "Fetched exchange rates");

        rate_for(&body.data, quote)
    }
}

/// Parses a decimal string from the API into a float.
///
/// # Errors
///
/// Returns [`BtcBarError::MalformedMessage`](crate::BtcBarError::MalformedMessage)
/// if `raw` is not a finite number.
pub fn parse_amount(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(crate::BtcBarError::MalformedMessage(format!(
            "invalid decimal amount `{raw}`"
        ))),
    }
}

/// Converts a spot response into a reading, preferring the currency the
/// API reports over the one implied by the pair.
fn spot_reading(pair: &str, body: SpotPriceResponse) -> Result<PriceReading> {
    let amount = parse_amount(&body.data.amount)?;
    let currency = body
        .data
        .currency
        .unwrap_or_else(|| quote_currency(pair).to_string());

    Ok(PriceReading::new(amount, currency))
}

/// Extracts one currency from a rate table.
fn rate_for(data: &ExchangeRatesData, quote: &str) -> Result<f64> {
    let raw = data.rates.get(quote).ok_or_else(|| {
        crate::BtcBarError::MalformedMessage(format!(
            "no {quote} rate in {} exchange rates",
            data.currency
        ))
    })?;

    parse_amount(raw)
}
