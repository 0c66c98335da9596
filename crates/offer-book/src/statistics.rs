//! Statistics Dump - reduced offer projection written for external analytics
//!
//! ```text
//! Inactive ──arm()──► ArmedForBootstrap ──bootstrap data received──► Active
//!                                                                     │
//!                     one dump after a fixed delay ◄──────────────────┤
//!                     one dump per offer book change ◄────────────────┘
//! ```
//!
//! A dump projects every current offer to a [`StatisticsRecord`], drops
//! offers that cannot be projected, serializes the list to JSON and hands it
//! to the artifact writer without waiting for the write.

use agora_core::{Amount, CurrencyMarkets, OfferDirection, Price};
use agora_ports::{ArtifactWriter, Executor, StorageNetwork};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::ChangeListenerBridge;
use crate::error::{OfferBookError, Result};
use crate::listener::OfferBookChangedListener;
use crate::offer::Offer;
use crate::snapshot::SnapshotQuery;

/// Flat, lossy projection of an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    pub direction: OfferDirection,
    pub currency_code: String,
    /// Market the offer is quoted in, e.g. `BTC/USD` or `XMR/BTC`
    pub currency_pair: String,
    /// Direction in that market (mirrored for crypto markets)
    pub primary_market_direction: OfferDirection,
    pub min_amount: Amount,
    pub amount: Amount,
    pub price: Price,
    /// Offer creation time in milliseconds since the epoch
    pub date: i64,
    pub id: String,
    pub use_market_based_price: bool,
    pub market_price_margin: Decimal,
    pub payment_method: String,
    pub volume: Decimal,
    pub min_volume: Decimal,
}

impl StatisticsRecord {
    /// Project an offer, failing on incomplete or inconsistent economic terms
    pub fn try_from_offer(offer: &Offer, markets: &CurrencyMarkets) -> Result<Self> {
        let fail = |reason: &str| OfferBookError::MaterializationFailed {
            offer_id: offer.id().clone(),
            reason: reason.to_string(),
        };

        if offer.currency_code().trim().is_empty() {
            return Err(fail("missing currency code"));
        }
        if offer.amount() <= Decimal::ZERO {
            return Err(fail("amount must be positive"));
        }
        if offer.min_amount() < Decimal::ZERO || offer.min_amount() > offer.amount() {
            return Err(fail("min amount out of range"));
        }
        if offer.payment_method_id().trim().is_empty() {
            return Err(fail("missing payment method"));
        }
        let price = offer.price().ok_or_else(|| fail("price unavailable"))?;
        if price <= Decimal::ZERO {
            return Err(fail("price must be positive"));
        }
        let volume = offer.volume().ok_or_else(|| fail("volume unavailable"))?;
        let min_volume = offer
            .min_volume()
            .ok_or_else(|| fail("min volume unavailable"))?;

        Ok(Self {
            direction: offer.direction(),
            currency_code: offer.currency_code().to_string(),
            currency_pair: markets.currency_pair(offer.currency_code()),
            primary_market_direction: markets
                .primary_market_direction(offer.direction(), offer.currency_code()),
            min_amount: offer.min_amount(),
            amount: offer.amount(),
            price,
            date: offer.date().timestamp_millis(),
            id: offer.id().clone(),
            use_market_based_price: offer.is_use_market_based_price(),
            market_price_margin: offer.market_price_margin(),
            payment_method: offer.payment_method_id().to_string(),
            volume,
            min_volume,
        })
    }
}

/// Builds and writes the statistics artifact
pub struct StatisticsDumper {
    snapshot: SnapshotQuery,
    writer: Arc<dyn ArtifactWriter>,
    artifact: String,
    markets: CurrencyMarkets,
}

impl StatisticsDumper {
    pub fn new(
        snapshot: SnapshotQuery,
        writer: Arc<dyn ArtifactWriter>,
        artifact: impl Into<String>,
        markets: CurrencyMarkets,
    ) -> Self {
        Self {
            snapshot,
            writer,
            artifact: artifact.into(),
            markets,
        }
    }

    /// Records for every current offer that can be projected
    ///
    /// Market-based offers whose currency has no market price are skipped;
    /// that only happens while the price feed is unavailable.
    pub fn collect_records(&self) -> Vec<StatisticsRecord> {
        self.snapshot
            .get_offers()
            .iter()
            .filter(|offer| {
                let missing = offer.is_missing_market_price();
                if missing {
                    debug!(
                        "Skipping offer {}: no market price for {}",
                        offer.id(),
                        offer.currency_code()
                    );
                }
                !missing
            })
            .filter_map(|offer| {
                StatisticsRecord::try_from_offer(offer, &self.markets)
                    .inspect_err(|err| warn!("Excluding offer from statistics: {}", err))
                    .ok()
            })
            .collect()
    }

    /// Build the records and write them in the background
    pub fn dump(&self) {
        let records = self.collect_records();
        match serde_json::to_string_pretty(&records) {
            Ok(json) => {
                debug!(
                    "Dumping {} offer records to '{}'",
                    records.len(),
                    self.artifact
                );
                self.writer.write_in_background(json, &self.artifact);
            }
            Err(err) => error!("Could not serialize offer statistics: {}", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpSchedulerState {
    Inactive,
    ArmedForBootstrap,
    Active,
}

/// Wires statistics dumps to bootstrap completion and offer book changes
pub struct StatisticsDumpScheduler {
    state: Mutex<DumpSchedulerState>,
    dumper: Arc<StatisticsDumper>,
    bridge: Arc<ChangeListenerBridge>,
    executor: Arc<dyn Executor>,
    initial_delay: Duration,
}

impl StatisticsDumpScheduler {
    pub fn new(
        dumper: Arc<StatisticsDumper>,
        bridge: Arc<ChangeListenerBridge>,
        executor: Arc<dyn Executor>,
        initial_delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(DumpSchedulerState::Inactive),
            dumper,
            bridge,
            executor,
            initial_delay,
        })
    }

    pub fn state(&self) -> DumpSchedulerState {
        *self.state.lock()
    }

    /// Hook activation onto the store's bootstrap-completion event
    ///
    /// Only the first call has an effect.
    pub fn arm(self: &Arc<Self>, storage: &dyn StorageNetwork) {
        {
            let mut state = self.state.lock();
            if *state != DumpSchedulerState::Inactive {
                return;
            }
            *state = DumpSchedulerState::ArmedForBootstrap;
        }

        let scheduler = self.clone();
        storage.on_bootstrap_data_received(Box::new(move || {
            // The store may fire this from its own thread
            let executor = scheduler.executor.clone();
            executor.execute(Box::new(move || scheduler.activate()));
        }));
        debug!("Statistics dump armed for bootstrap");
    }

    fn activate(&self) {
        {
            let mut state = self.state.lock();
            if *state != DumpSchedulerState::ArmedForBootstrap {
                return;
            }
            *state = DumpSchedulerState::Active;
        }

        self.bridge
            .add_offer_book_changed_listener(Arc::new(DumpOnChange {
                dumper: self.dumper.clone(),
            }));

        let dumper = self.dumper.clone();
        self.executor
            .execute_after(self.initial_delay, Box::new(move || dumper.dump()));

        info!(
            "Bootstrap complete, statistics dump active (first dump in {:?})",
            self.initial_delay
        );
    }
}

struct DumpOnChange {
    dumper: Arc<StatisticsDumper>,
}

impl OfferBookChangedListener for DumpOnChange {
    fn on_added(&self, _offer: &Offer) {
        self.dumper.dump();
    }

    fn on_removed(&self, _offer: &Offer) {
        self.dumper.dump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStorageNetwork, StaticPriceFeed};
    use crate::materializer::OfferMaterializer;
    use agora_core::{MarketPrice, OfferPayload, StoredEntry};
    use agora_executor::ManualExecutor;
    use agora_ports::PortResult;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<(String, String)>>,
    }

    impl RecordingWriter {
        fn write_count(&self) -> usize {
            self.writes.lock().len()
        }

        fn last_records(&self) -> Vec<StatisticsRecord> {
            let writes = self.writes.lock();
            let (_, json) = writes.last().expect("no dump written");
            serde_json::from_str(json).unwrap()
        }
    }

    impl ArtifactWriter for RecordingWriter {
        fn write(&self, json: &str, name: &str) -> PortResult<PathBuf> {
            self.writes.lock().push((name.to_string(), json.to_string()));
            Ok(PathBuf::from(name))
        }

        fn write_in_background(&self, json: String, name: &str) {
            self.writes.lock().push((name.to_string(), json));
        }
    }

    struct Fixture {
        storage: Arc<InMemoryStorageNetwork>,
        feed: Arc<StaticPriceFeed>,
        executor: Arc<ManualExecutor>,
        writer: Arc<RecordingWriter>,
        bridge: Arc<ChangeListenerBridge>,
        dumper: Arc<StatisticsDumper>,
    }

    fn fixture() -> Fixture {
        let storage = Arc::new(InMemoryStorageNetwork::new());
        let feed = Arc::new(StaticPriceFeed::new());
        let executor = ManualExecutor::new();
        let writer = Arc::new(RecordingWriter::default());
        let materializer = OfferMaterializer::new(feed.clone());
        let bridge = ChangeListenerBridge::subscribe(
            storage.as_ref(),
            materializer.clone(),
            executor.clone(),
        );
        let dumper = Arc::new(StatisticsDumper::new(
            SnapshotQuery::new(storage.clone(), materializer),
            writer.clone(),
            "offers_statistics",
            CurrencyMarkets::new(["XMR"]),
        ));
        Fixture {
            storage,
            feed,
            executor,
            writer,
            bridge,
            dumper,
        }
    }

    fn fixed(id: &str) -> StoredEntry {
        StoredEntry::new(
            OfferPayload::builder(OfferDirection::Buy, "USD")
                .id(id)
                .fixed_price(dec!(50000))
                .amount(dec!(0.1), dec!(0.5))
                .payment_method("SEPA")
                .build(),
        )
    }

    fn market(id: &str, currency: &str) -> StoredEntry {
        StoredEntry::new(
            OfferPayload::builder(OfferDirection::Sell, currency)
                .id(id)
                .market_based(dec!(0.01))
                .amount(dec!(1), dec!(2))
                .payment_method("CASH_DEPOSIT")
                .build(),
        )
    }

    fn ids(records: &[StatisticsRecord]) -> HashSet<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_market_offers_without_price_are_excluded() {
        let f = fixture();
        f.feed.set_price(MarketPrice::new("EUR", dec!(40000), 0));
        f.storage.apply_remote_added(vec![
            fixed("A"),
            market("B", "XMR"),
            market("C", "EUR"),
        ]);

        let records = f.dumper.collect_records();

        assert_eq!(ids(&records), HashSet::from(["A".to_string(), "C".to_string()]));
        let c = records.iter().find(|r| r.id == "C").unwrap();
        assert_eq!(c.price, dec!(40400));
        assert!(c.use_market_based_price);
        assert_eq!(c.volume, dec!(80800));
    }

    #[test]
    fn test_corrupted_offers_are_excluded() {
        let f = fixture();
        let inverted = OfferPayload::builder(OfferDirection::Buy, "USD")
            .id("inverted")
            .fixed_price(dec!(100))
            .amount(dec!(5), dec!(1))
            .payment_method("SEPA")
            .build();
        let no_method = OfferPayload::builder(OfferDirection::Buy, "USD")
            .id("no-method")
            .fixed_price(dec!(100))
            .amount(dec!(1), dec!(1))
            .build();
        let zero_price = OfferPayload::builder(OfferDirection::Buy, "USD")
            .id("zero-price")
            .amount(dec!(1), dec!(1))
            .payment_method("SEPA")
            .build();
        f.storage.apply_remote_added(vec![
            fixed("ok"),
            StoredEntry::new(inverted),
            StoredEntry::new(no_method),
            StoredEntry::new(zero_price),
        ]);

        assert_eq!(ids(&f.dumper.collect_records()), HashSet::from(["ok".to_string()]));
    }

    #[test]
    fn test_dump_writes_json_artifact() {
        let f = fixture();
        let xmr = OfferPayload::builder(OfferDirection::Buy, "XMR")
            .id("X")
            .fixed_price(dec!(0.004))
            .amount(dec!(1), dec!(1))
            .payment_method("BLOCK_CHAINS")
            .build();
        f.storage
            .apply_remote_added(vec![fixed("A"), StoredEntry::new(xmr)]);

        f.dumper.dump();

        assert_eq!(f.writer.write_count(), 1);
        assert_eq!(f.writer.writes.lock()[0].0, "offers_statistics");
        let json = f.writer.writes.lock()[0].1.clone();
        assert!(json.contains("\"currencyCode\": \"USD\""));
        assert!(json.contains("\"currencyPair\": \"BTC/USD\""));
        assert!(json.contains("\"primaryMarketDirection\": \"BUY\""));

        let records = f.writer.last_records();
        assert_eq!(
            ids(&records),
            HashSet::from(["A".to_string(), "X".to_string()])
        );
        let x = records.iter().find(|r| r.id == "X").unwrap();
        assert_eq!(x.currency_pair, "XMR/BTC");
        assert_eq!(x.direction, OfferDirection::Buy);
        assert_eq!(x.primary_market_direction, OfferDirection::Sell);
        assert_eq!(x.volume, dec!(0.004));
    }

    #[test]
    fn test_scheduler_lifecycle() {
        let f = fixture();
        let scheduler = StatisticsDumpScheduler::new(
            f.dumper.clone(),
            f.bridge.clone(),
            f.executor.clone(),
            Duration::from_secs(1),
        );
        assert_eq!(scheduler.state(), DumpSchedulerState::Inactive);

        scheduler.arm(f.storage.as_ref());
        assert_eq!(scheduler.state(), DumpSchedulerState::ArmedForBootstrap);

        // Changes before bootstrap do not dump
        let a = fixed("A");
        f.storage.apply_remote_added(vec![a.clone()]);
        f.executor.run_pending();
        assert_eq!(f.writer.write_count(), 0);

        f.storage.set_bootstrapped();
        f.executor.run_pending();
        assert_eq!(scheduler.state(), DumpSchedulerState::Active);
        assert_eq!(f.bridge.listener_count(), 1);
        assert_eq!(f.writer.write_count(), 0);

        f.executor.advance(Duration::from_secs(1));
        assert_eq!(f.writer.write_count(), 1);

        f.storage.apply_remote_added(vec![fixed("B")]);
        f.executor.run_pending();
        assert_eq!(f.writer.write_count(), 2);
        assert_eq!(
            ids(&f.writer.last_records()),
            HashSet::from(["A".to_string(), "B".to_string()])
        );

        f.storage.apply_remote_removed(vec![a]);
        f.executor.run_pending();
        assert_eq!(f.writer.write_count(), 3);
    }

    #[test]
    fn test_arm_twice_registers_once() {
        let f = fixture();
        let scheduler = StatisticsDumpScheduler::new(
            f.dumper.clone(),
            f.bridge.clone(),
            f.executor.clone(),
            Duration::from_millis(10),
        );

        scheduler.arm(f.storage.as_ref());
        scheduler.arm(f.storage.as_ref());
        f.storage.set_bootstrapped();
        f.storage.set_bootstrapped();
        f.executor.advance(Duration::from_secs(1));

        assert_eq!(f.bridge.listener_count(), 1);
        assert_eq!(f.writer.write_count(), 1);
    }

    #[test]
    fn test_arming_after_bootstrap_activates_immediately() {
        let f = fixture();
        f.storage.set_bootstrapped();
        let scheduler = StatisticsDumpScheduler::new(
            f.dumper.clone(),
            f.bridge.clone(),
            f.executor.clone(),
            Duration::from_secs(1),
        );

        scheduler.arm(f.storage.as_ref());
        f.executor.run_pending();

        assert_eq!(scheduler.state(), DumpSchedulerState::Active);
    }
}
