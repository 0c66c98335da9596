//! Adapters for the offer book ports
//!
//! - [`JsonFileManager`]: JSON artifacts on the local file system
//! - [`InMemoryStorageNetwork`]: single-process network store for simulation and tests
//! - [`StaticPriceFeed`]: price feed holding manually set prices
//! - [`StaticEligibility`]: switchable trading eligibility policy

mod eligibility;
mod in_memory_storage;
mod json_file;
mod price_feed;

pub use eligibility::StaticEligibility;
pub use in_memory_storage::{InMemoryStorageNetwork, StorageCall};
pub use json_file::{JsonFileManager, write_json_file};
pub use price_feed::StaticPriceFeed;
