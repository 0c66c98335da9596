use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
/// Quoted in the offer's currency per one unit of the base asset
pub type Price = Decimal;

/// Amount of the base asset offered - uses Decimal for precision
pub type Amount = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// ISO or ticker code of a currency (e.g. "USD", "XMR")
pub type CurrencyCode = String;
