//! Price, holdings and exchange-rate state owned by the UI loop.
//!
//! Background tasks never mutate this directly; they send messages and the
//! owning task applies them through the accessors below, so every derived
//! value (worth, converted price) is computed from one consistent snapshot.

/// A single accepted price observation.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceReading {
    /// Price of one unit of the base asset.
    pub amount: f64,
    /// Quote currency of `amount`, e.g. `USD`.
    pub currency: String,
}

impl PriceReading {
    /// Creates a reading.
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// Latest price, holdings quantity and conversion rate.
#[derive(Clone, Debug)]
pub struct TrackerState {
    price: Option<PriceReading>,
    holdings: f64,
    display_currency: String,
    fx_rate: f64,
}

impl TrackerState {
    /// Creates state with the given holdings and no price.
    ///
    /// The exchange rate starts at zero and stays there until the first
    /// successful fetch, so converted values read as zero until then.
    pub fn new(holdings: f64, display_currency: impl Into<String>) -> Self {
        Self {
            price: None,
            holdings,
            display_currency: display_currency.into(),
            fx_rate: 0.0,
        }
    }

    /// Replaces the current price. Last write wins; no ordering checks.
    pub fn apply_price(&mut self, reading: PriceReading) {
        self.price = Some(reading);
    }

    /// Replaces the holdings quantity.
    pub fn set_holdings(&mut self, quantity: f64) {
        self.holdings = quantity;
    }

    /// Replaces the conversion rate into the display currency.
    pub fn set_fx_rate(&mut self, rate: f64) {
        self.fx_rate = rate;
    }

    pub fn price(&self) -> Option<&PriceReading> {
        self.price.as_ref()
    }

    pub fn holdings(&self) -> f64 {
        self.holdings
    }

    pub fn fx_rate(&self) -> f64 {
        self.fx_rate
    }

    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    /// Returns `true` when prices must be converted to reach the display currency.
    pub fn needs_conversion(&self) -> bool {
        self.price
            .as_ref()
            .is_some_and(|p| p.currency != self.display_currency)
    }

    /// Holdings multiplied by the current price, in the price currency.
    pub fn worth(&self) -> Option<f64> {
        self.price.as_ref().map(|p| self.holdings * p.amount)
    }

    /// Current price in the display currency.
    pub fn converted_price(&self) -> Option<f64> {
        self.price.as_ref().map(|p| self.convert(p))
    }

    /// Worth in the display currency.
    pub fn converted_worth(&self) -> Option<f64> {
        self.converted_price().map(|price| self.holdings * price)
    }

    fn convert(&self, reading: &PriceReading) -> f64 {
        if reading.currency == self.display_currency {
            reading.amount
        } else {
            reading.amount * self.fx_rate
        }
    }
}
