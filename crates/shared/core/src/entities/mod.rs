mod currency_market;
mod direction;
mod market_price;
mod offer_payload;
mod stored_entry;

pub use currency_market::{BASE_CURRENCY, CurrencyMarkets};
pub use direction::OfferDirection;
pub use market_price::MarketPrice;
pub use offer_payload::{OfferId, OfferPayload, OfferPayloadBuilder};
pub use stored_entry::{OpaquePayload, StoragePayload, StoredEntry};
