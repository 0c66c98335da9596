use serde::{Deserialize, Serialize};

use crate::values::{CurrencyCode, Price};

/// Latest market price for a currency, as reported by a price feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub currency_code: CurrencyCode,
    pub price: Price,
    /// Provider timestamp in seconds since the epoch
    pub timestamp_sec: i64,
}

impl MarketPrice {
    pub fn new(currency_code: impl Into<CurrencyCode>, price: Price, timestamp_sec: i64) -> Self {
        Self {
            currency_code: currency_code.into(),
            price,
            timestamp_sec,
        }
    }

    /// A price is usable for market-based offers only when it is positive
    pub fn is_usable(&self) -> bool {
        self.price.is_sign_positive() && !self.price.is_zero()
    }
}
