use std::collections::HashSet;

use super::OfferDirection;
use crate::values::CurrencyCode;

/// Asset every offer trades against
pub const BASE_CURRENCY: &str = "BTC";

/// Labels offers by the market they are quoted in
///
/// Fiat offers trade on `BTC/<fiat>` markets. Crypto offers trade on
/// `<crypto>/BTC` markets, where the base asset is the quote side, so their
/// direction in that market is the mirror of the offer direction.
#[derive(Debug, Clone, Default)]
pub struct CurrencyMarkets {
    crypto_currencies: HashSet<CurrencyCode>,
}

impl CurrencyMarkets {
    pub fn new<I, S>(crypto_currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CurrencyCode>,
    {
        Self {
            crypto_currencies: crypto_currencies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_crypto(&self, currency_code: &str) -> bool {
        self.crypto_currencies.contains(currency_code)
    }

    /// Market label such as `BTC/USD` or `XMR/BTC`
    pub fn currency_pair(&self, currency_code: &str) -> String {
        if self.is_crypto(currency_code) {
            format!("{}/{}", currency_code, BASE_CURRENCY)
        } else {
            format!("{}/{}", BASE_CURRENCY, currency_code)
        }
    }

    /// Direction of the offer in its primary market
    pub fn primary_market_direction(
        &self,
        direction: OfferDirection,
        currency_code: &str,
    ) -> OfferDirection {
        if self.is_crypto(currency_code) {
            direction.mirrored()
        } else {
            direction
        }
    }
}
