//! Agora Offer Book - local view of the offers published on the network store
//!
//! - **Materializer**: wraps raw offer payloads as [`Offer`]s priced by the feed
//! - **Change Listener Bridge**: forwards store changes to offer book listeners
//! - **Mutation Gateway**: eligibility-gated add / refresh / remove
//! - **Snapshot Query**: the current offer list on demand
//! - **Statistics Dump**: JSON projection of the offer book for analytics
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────────────────────────────────────┐
//!              │          Network Store (port)            │
//!              └───┬──────────────▲───────────────▲───────┘
//!   change batches │              │ write/remove  │ snapshot
//!                  ▼              │ refresh       │
//!      ┌───────────────────┐  ┌───┴─────────────┐ │
//!      │  Change Listener  │  │ Mutation Gateway│ │
//!      │      Bridge       │  │ (eligibility)   │ │
//!      └─────────┬─────────┘  └─────────────────┘ │
//!                │ Executor                ┌──────┴────────┐
//!                ▼                         │ Snapshot Query│
//!      ┌───────────────────┐               └──────┬────────┘
//!      │ OfferBookChanged  │                      │
//!      │ listeners         │──► Statistics Dump ◄─┘
//!      └───────────────────┘          │
//!                                     ▼
//!                              ArtifactWriter (JSON)
//! ```

pub mod adapters;
pub mod bridge;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod listener;
pub mod materializer;
pub mod offer;
pub mod service;
pub mod snapshot;
pub mod statistics;

pub use bridge::ChangeListenerBridge;
pub use config::{ConfigError, OfferBookConfig, load_config, load_config_from_str};
pub use diagnostics::SnapshotDiagnostics;
pub use error::{OfferBookError, Result, StorageOperation};
pub use gateway::{ErrorMessageHandler, MutationGateway, ResultHandler};
pub use listener::{FnListener, OfferBookChangedListener};
pub use materializer::OfferMaterializer;
pub use offer::Offer;
pub use service::OfferBookService;
pub use snapshot::SnapshotQuery;
pub use statistics::{
    DumpSchedulerState, StatisticsDumpScheduler, StatisticsDumper, StatisticsRecord,
};
