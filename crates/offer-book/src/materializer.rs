//! Offer Materializer - turns stored offer payloads into domain offers

use agora_core::OfferPayload;
use agora_ports::PriceFeed;
use std::sync::Arc;

use crate::offer::Offer;

/// Builds a fresh [`Offer`] for every payload, bound to the price feed
///
/// Only the offer variant of a stored payload can be materialized; callers
/// pattern-match `StoragePayload::Offer` before handing the payload over.
#[derive(Clone)]
pub struct OfferMaterializer {
    price_feed: Arc<dyn PriceFeed>,
}

impl OfferMaterializer {
    pub fn new(price_feed: Arc<dyn PriceFeed>) -> Self {
        Self { price_feed }
    }

    pub fn materialize(&self, payload: Arc<OfferPayload>) -> Offer {
        Offer::new(payload, self.price_feed.clone())
    }

    pub fn price_feed(&self) -> &Arc<dyn PriceFeed> {
        &self.price_feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticPriceFeed;
    use agora_core::{MarketPrice, OfferDirection};
    use rust_decimal_macros::dec;

    #[test]
    fn test_materialized_offer_resolves_market_price() {
        let feed = Arc::new(StaticPriceFeed::new());
        feed.set_price(MarketPrice::new("EUR", dec!(40000), 0));
        let materializer = OfferMaterializer::new(feed);

        let payload = Arc::new(
            OfferPayload::builder(OfferDirection::Sell, "EUR")
                .market_based(dec!(0.05))
                .amount(dec!(1), dec!(1))
                .build(),
        );
        let offer = materializer.materialize(payload.clone());

        assert!(Arc::ptr_eq(offer.payload(), &payload));
        assert_eq!(offer.price(), Some(dec!(42000)));
    }

    #[test]
    fn test_every_call_builds_a_new_offer() {
        let materializer = OfferMaterializer::new(Arc::new(StaticPriceFeed::new()));
        let payload = Arc::new(OfferPayload::builder(OfferDirection::Buy, "USD").build());

        let first = materializer.materialize(payload.clone());
        let second = materializer.materialize(payload);

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(first.payload(), second.payload()));
    }
}
