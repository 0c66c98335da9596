//! Agora Ports
//!
//! Port definitions (traits) for the Agora offer book.
//! These define the boundaries between the offer book and the collaborators
//! it does not own: the replicated network store, the price feed, the trading
//! eligibility policy, artifact persistence and the execution context.

mod artifact;
mod eligibility;
mod error;
mod executor;
mod price_feed;
mod storage;

pub use artifact::ArtifactWriter;
pub use eligibility::TradingEligibility;
pub use error::{PortError, PortResult};
pub use executor::{Executor, Task};
pub use price_feed::PriceFeed;
pub use storage::{BootstrapCallback, StorageChangeListener, StorageNetwork};
