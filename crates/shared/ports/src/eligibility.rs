/// Port for the trading eligibility policy
///
/// Blocks trading-affecting operations, e.g. when a mandatory client update
/// is required.
pub trait TradingEligibility: Send + Sync {
    /// True while trading must be refused
    fn requires_update_for_trading(&self) -> bool;

    /// Human-readable reason reported to the user when trading is refused
    fn rejection_reason(&self) -> String {
        "A mandatory update is required before you can trade.".to_string()
    }
}
