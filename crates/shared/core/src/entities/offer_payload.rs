use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OfferDirection;
use crate::values::{Amount, CurrencyCode, Price, Timestamp};

/// Unique identifier for an offer
pub type OfferId = String;

/// Immutable economic terms of a trade offer as published to the network store
///
/// The payload is owned by the storage layer and never mutated once created.
/// Domain reads go through `Offer` in the offer-book crate, which binds a
/// price feed so market-based prices can be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPayload {
    pub id: OfferId,
    /// Creation time of the offer
    pub date: Timestamp,
    pub direction: OfferDirection,
    pub currency_code: CurrencyCode,
    /// Fixed price; zero when the offer uses a market-based price
    pub price: Price,
    pub use_market_based_price: bool,
    /// Distance from the market price as a fraction (0.02 = 2%)
    pub market_price_margin: Decimal,
    /// Maximum amount of the base asset
    pub amount: Amount,
    pub min_amount: Amount,
    pub payment_method_id: String,
}

impl OfferPayload {
    /// Start building a payload with a fresh id and the current time
    pub fn builder(
        direction: OfferDirection,
        currency_code: impl Into<CurrencyCode>,
    ) -> OfferPayloadBuilder {
        OfferPayloadBuilder::new(direction, currency_code)
    }
}

/// Builder for `OfferPayload`
///
/// Defaults: fixed price of zero, zero amounts, empty payment method.
#[derive(Debug, Clone)]
pub struct OfferPayloadBuilder {
    payload: OfferPayload,
}

impl OfferPayloadBuilder {
    pub fn new(direction: OfferDirection, currency_code: impl Into<CurrencyCode>) -> Self {
        Self {
            payload: OfferPayload {
                id: Uuid::new_v4().to_string(),
                date: Utc::now(),
                direction,
                currency_code: currency_code.into(),
                price: Decimal::ZERO,
                use_market_based_price: false,
                market_price_margin: Decimal::ZERO,
                amount: Decimal::ZERO,
                min_amount: Decimal::ZERO,
                payment_method_id: String::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<OfferId>) -> Self {
        self.payload.id = id.into();
        self
    }

    pub fn date(mut self, date: Timestamp) -> Self {
        self.payload.date = date;
        self
    }

    /// Use a fixed price (clears any market-based pricing)
    pub fn fixed_price(mut self, price: Price) -> Self {
        self.payload.price = price;
        self.payload.use_market_based_price = false;
        self.payload.market_price_margin = Decimal::ZERO;
        self
    }

    /// Price relative to the market price of the currency
    pub fn market_based(mut self, margin: Decimal) -> Self {
        self.payload.price = Decimal::ZERO;
        self.payload.use_market_based_price = true;
        self.payload.market_price_margin = margin;
        self
    }

    pub fn amount(mut self, min_amount: Amount, amount: Amount) -> Self {
        self.payload.min_amount = min_amount;
        self.payload.amount = amount;
        self
    }

    pub fn payment_method(mut self, payment_method_id: impl Into<String>) -> Self {
        self.payload.payment_method_id = payment_method_id.into();
        self
    }


    pub fn build(self) -> OfferPayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_fixed_price() {
        let payload = OfferPayload::builder(OfferDirection::Buy, "USD")
            .id("offer-1")
            .fixed_price(dec!(42000))
            .amount(dec!(0.01), dec!(0.05))
            .payment_method("SEPA")
            .build();

        assert_eq!(payload.id, "offer-1");
        assert_eq!(payload.currency_code, "USD");
        assert_eq!(payload.price, dec!(42000));
        assert!(!payload.use_market_based_price);
        assert_eq!(payload.min_amount, dec!(0.01));
    }

    #[test]
    fn test_market_based_clears_fixed_price() {
        let payload = OfferPayload::builder(OfferDirection::Sell, "EUR")
            .fixed_price(dec!(100))
            .market_based(dec!(0.02))
            .amount(dec!(1), dec!(1))
            .build();

        assert!(payload.use_market_based_price);
        assert_eq!(payload.price, Decimal::ZERO);
        assert_eq!(payload.market_price_margin, dec!(0.02));
    }

    #[test]
    fn test_builder_generates_unique_ids() {
        let a = OfferPayload::builder(OfferDirection::Buy, "USD").build();
        let b = OfferPayload::builder(OfferDirection::Buy, "USD").build();
        assert_ne!(a.id, b.id);
    }
}
