use agora_core::MarketPrice;
use agora_ports::PriceFeed;
use dashmap::DashMap;

/// Price feed backed by prices set by the application
#[derive(Default)]
pub struct StaticPriceFeed {
    prices: DashMap<String, MarketPrice>,
}

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the price for its currency
    pub fn set_price(&self, price: MarketPrice) {
        self.prices.insert(price.currency_code.clone(), price);
    }

    pub fn remove_price(&self, currency_code: &str) {
        self.prices.remove(currency_code);
    }
}

impl PriceFeed for StaticPriceFeed {
    fn market_price(&self, currency_code: &str) -> Option<MarketPrice> {
        self.prices
            .get(currency_code)
            .map(|entry| entry.value().clone())
    }
}
