use agora_core::MarketPrice;

/// Port for market price lookups
pub trait PriceFeed: Send + Sync {
    /// Latest market price for `currency_code`, or None if the feed has none
    fn market_price(&self, currency_code: &str) -> Option<MarketPrice>;
}
