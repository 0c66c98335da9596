//! Agora Core Domain
//!
//! Pure domain types for the Agora offer book.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    BASE_CURRENCY, CurrencyMarkets, MarketPrice, OfferDirection, OfferId, OfferPayload,
    OfferPayloadBuilder, OpaquePayload, StoragePayload, StoredEntry,
};
pub use values::{Amount, CurrencyCode, Price, Timestamp};
