//! Offer - domain view of an offer payload
//!
//! An `Offer` wraps the immutable payload published on the network store and
//! the price feed needed to resolve market-based prices. Offers are built
//! fresh by the [`OfferMaterializer`](crate::OfferMaterializer) and never cached.

use agora_core::{Amount, OfferDirection, OfferId, OfferPayload, Price, Timestamp};
use agora_ports::PriceFeed;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Decimal places kept when deriving a price from the market price
const PRICE_PRECISION: u32 = 8;

#[derive(Clone)]
pub struct Offer {
    payload: Arc<OfferPayload>,
    price_feed: Arc<dyn PriceFeed>,
}

impl Offer {
    pub(crate) fn new(payload: Arc<OfferPayload>, price_feed: Arc<dyn PriceFeed>) -> Self {
        Self {
            payload,
            price_feed,
        }
    }

    /// The wrapped payload, as stored on the network
    pub fn payload(&self) -> &Arc<OfferPayload> {
        &self.payload
    }

    pub fn id(&self) -> &OfferId {
        &self.payload.id
    }

    pub fn direction(&self) -> OfferDirection {
        self.payload.direction
    }

    pub fn currency_code(&self) -> &str {
        &self.payload.currency_code
    }

    pub fn amount(&self) -> Amount {
        self.payload.amount
    }

    pub fn min_amount(&self) -> Amount {
        self.payload.min_amount
    }

    pub fn date(&self) -> Timestamp {
        self.payload.date
    }

    pub fn payment_method_id(&self) -> &str {
        &self.payload.payment_method_id
    }

    pub fn is_use_market_based_price(&self) -> bool {
        self.payload.use_market_based_price
    }

    pub fn market_price_margin(&self) -> Decimal {
        self.payload.market_price_margin
    }

    /// Effective price of the offer
    ///
    /// Fixed-price offers return their stored price. Market-based offers
    /// apply the margin to the current market price: a buyer bids below the
    /// market (`1 - margin`), a seller asks above it (`1 + margin`).
    /// Returns None when no usable market price is available.
    pub fn price(&self) -> Option<Price> {
        if !self.payload.use_market_based_price {
            return Some(self.payload.price);
        }

        let market_price = self.price_feed.market_price(&self.payload.currency_code)?;
        if !market_price.is_usable() {
            return None;
        }

        let margin = self.payload.market_price_margin;
        let factor = match self.payload.direction {
            OfferDirection::Buy => Decimal::ONE - margin,
            OfferDirection::Sell => Decimal::ONE + margin,
        };

        let price = (market_price.price * factor).round_dp(PRICE_PRECISION);
        (price > Decimal::ZERO).then_some(price)
    }

    /// True if the offer needs a market price the feed currently lacks
    pub fn is_missing_market_price(&self) -> bool {
        self.payload.use_market_based_price
            && self
                .price_feed
                .market_price(&self.payload.currency_code)
                .is_none()
    }

    /// Value of the maximum amount in the offer's currency
    pub fn volume(&self) -> Option<Decimal> {
        self.price().map(|price| price * self.payload.amount)
    }

    /// Value of the minimum amount in the offer's currency
    pub fn min_volume(&self) -> Option<Decimal> {
        self.price().map(|price| price * self.payload.min_amount)
    }
}

/// Offers wrapping equal payloads are interchangeable
impl PartialEq for Offer {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl Eq for Offer {}

impl fmt::Debug for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Offer")
            .field("id", &self.payload.id)
            .field("direction", &self.payload.direction)
            .field("currency_code", &self.payload.currency_code)
            .field("use_market_based_price", &self.payload.use_market_based_price)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticPriceFeed;
    use agora_core::MarketPrice;
    use rust_decimal_macros::dec;

    fn feed_with_usd(price: Decimal) -> Arc<StaticPriceFeed> {
        let feed = Arc::new(StaticPriceFeed::new());
        feed.set_price(MarketPrice::new("USD", price, 1_700_000_000));
        feed
    }

    fn market_offer(direction: OfferDirection, currency: &str, margin: Decimal) -> OfferPayload {
        OfferPayload::builder(direction, currency)
            .market_based(margin)
            .amount(dec!(0.5), dec!(1))
            .payment_method("SEPA")
            .build()
    }

    #[test]
    fn test_fixed_price_ignores_feed() {
        let payload = OfferPayload::builder(OfferDirection::Buy, "USD")
            .fixed_price(dec!(30000))
            .amount(dec!(0.1), dec!(0.2))
            .build();
        let offer = Offer::new(Arc::new(payload), Arc::new(StaticPriceFeed::new()));

        assert_eq!(offer.price(), Some(dec!(30000)));
        assert_eq!(offer.volume(), Some(dec!(6000)));
        assert_eq!(offer.min_volume(), Some(dec!(3000)));
        assert!(!offer.is_missing_market_price());
    }

    #[test]
    fn test_market_based_price_applies_margin() {
        let feed = feed_with_usd(dec!(50000));

        let buy = Offer::new(
            Arc::new(market_offer(OfferDirection::Buy, "USD", dec!(0.02))),
            feed.clone(),
        );
        let sell = Offer::new(
            Arc::new(market_offer(OfferDirection::Sell, "USD", dec!(0.02))),
            feed,
        );

        assert_eq!(buy.price(), Some(dec!(49000)));
        assert_eq!(sell.price(), Some(dec!(51000)));
    }

    #[test]
    fn test_market_based_price_missing() {
        let offer = Offer::new(
            Arc::new(market_offer(OfferDirection::Sell, "XMR", dec!(0.01))),
            feed_with_usd(dec!(50000)),
        );

        assert_eq!(offer.price(), None);
        assert_eq!(offer.volume(), None);
        assert!(offer.is_missing_market_price());
    }

    #[test]
    fn test_margin_wiping_out_price_yields_none() {
        let offer = Offer::new(
            Arc::new(market_offer(OfferDirection::Buy, "USD", dec!(1))),
            feed_with_usd(dec!(50000)),
        );
        assert_eq!(offer.price(), None);
    }

    #[test]
    fn test_price_tracks_feed_updates() {
        let feed = feed_with_usd(dec!(100));
        let offer = Offer::new(
            Arc::new(market_offer(OfferDirection::Sell, "USD", dec!(0.1))),
            feed.clone(),
        );
        assert_eq!(offer.price(), Some(dec!(110)));

        feed.set_price(MarketPrice::new("USD", dec!(200), 1_700_000_060));
        assert_eq!(offer.price(), Some(dec!(220)));
    }

    #[test]
    fn test_offers_with_same_payload_are_equal() {
        let payload = Arc::new(market_offer(OfferDirection::Buy, "USD", dec!(0)));
        let a = Offer::new(payload.clone(), Arc::new(StaticPriceFeed::new()));
        let b = Offer::new(payload, feed_with_usd(dec!(1)));
        assert_eq!(a, b);
    }
}
