use std::collections::HashMap;

use serde::Deserialize;

/// Body of `GET /prices/{pair}/spot`.
#[derive(Debug, Deserialize)]
pub struct SpotPriceResponse {
    pub data: SpotPriceData,
}

#[derive(Debug, Deserialize)]
pub struct SpotPriceData {
    /// Price as a decimal string.
    pub amount: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Body of `GET /exchange-rates?currency={base}`.
#[derive(Debug, Deserialize)]
pub struct ExchangeRatesResponse {
    pub data: ExchangeRatesData,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRatesData {
    pub currency: String,
    /// Units of each currency per one unit of `currency`, as decimal strings.
    pub rates: HashMap<String, String>,
}
