//! Offer Book Service - the public face of the offer book
//!
//! Wires the components together from an [`OfferBookConfig`] and the ports
//! supplied by the host application:
//!
//! - the bridge subscribes to the network store once, at construction
//! - the statistics scheduler is armed when `dump_statistics` is set
//! - snapshot diagnostics are available when `snapshot_dump_dir` is set

use agora_core::{CurrencyMarkets, OfferPayload};
use agora_ports::{ArtifactWriter, Executor, PriceFeed, StorageNetwork, TradingEligibility};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::JsonFileManager;
use crate::bridge::ChangeListenerBridge;
use crate::config::OfferBookConfig;
use crate::diagnostics::SnapshotDiagnostics;
use crate::error::Result;
use crate::gateway::{ErrorMessageHandler, MutationGateway, ResultHandler};
use crate::listener::OfferBookChangedListener;
use crate::materializer::OfferMaterializer;
use crate::offer::Offer;
use crate::snapshot::SnapshotQuery;
use crate::statistics::{DumpSchedulerState, StatisticsDumpScheduler, StatisticsDumper};

pub struct OfferBookService {
    storage: Arc<dyn StorageNetwork>,
    bridge: Arc<ChangeListenerBridge>,
    gateway: MutationGateway,
    snapshot: SnapshotQuery,
    materializer: OfferMaterializer,
    statistics: Option<Arc<StatisticsDumpScheduler>>,
    diagnostics: Option<SnapshotDiagnostics>,
}

impl OfferBookService {
    /// Create the service, writing the statistics artifact under `storage_dir`
    ///
    /// With `dump_statistics` set the JSON writer runs on the current tokio
    /// runtime, so the service must then be created from within one.
    pub fn new(
        config: OfferBookConfig,
        storage: Arc<dyn StorageNetwork>,
        price_feed: Arc<dyn PriceFeed>,
        eligibility: Arc<dyn TradingEligibility>,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        config.validate()?;
        let writer: Option<Arc<dyn ArtifactWriter>> = if config.dump_statistics {
            Some(Arc::new(JsonFileManager::spawn(config.storage_dir.clone())?))
        } else {
            None
        };
        Ok(Self::build(
            config,
            storage,
            price_feed,
            eligibility,
            executor,
            writer,
        ))
    }

    /// Create the service with a caller-provided artifact writer
    pub fn with_artifact_writer(
        config: OfferBookConfig,
        storage: Arc<dyn StorageNetwork>,
        price_feed: Arc<dyn PriceFeed>,
        eligibility: Arc<dyn TradingEligibility>,
        executor: Arc<dyn Executor>,
        writer: Arc<dyn ArtifactWriter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            config,
            storage,
            price_feed,
            eligibility,
            executor,
            Some(writer),
        ))
    }

    fn build(
        config: OfferBookConfig,
        storage: Arc<dyn StorageNetwork>,
        price_feed: Arc<dyn PriceFeed>,
        eligibility: Arc<dyn TradingEligibility>,
        executor: Arc<dyn Executor>,
        writer: Option<Arc<dyn ArtifactWriter>>,
    ) -> Self {
        let materializer = OfferMaterializer::new(price_feed.clone());
        let bridge = ChangeListenerBridge::subscribe(
            storage.as_ref(),
            materializer.clone(),
            executor.clone(),
        );
        let gateway = MutationGateway::new(storage.clone(), eligibility);
        let snapshot = SnapshotQuery::new(storage.clone(), materializer.clone());

        let statistics = writer
            .filter(|_| config.dump_statistics)
            .map(|writer| {
                let dumper = Arc::new(StatisticsDumper::new(
                    snapshot.clone(),
                    writer,
                    config.statistics_artifact.clone(),
                    CurrencyMarkets::new(config.crypto_currencies.clone()),
                ));
                let scheduler = StatisticsDumpScheduler::new(
                    dumper,
                    bridge.clone(),
                    executor,
                    config.statistics_dump_delay(),
                );
                scheduler.arm(storage.as_ref());
                scheduler
            });

        let diagnostics = config.snapshot_dump_dir.clone().map(|root| {
            SnapshotDiagnostics::new(
                root,
                config.snapshot_dump_currencies.clone(),
                snapshot.clone(),
                price_feed,
            )
        });

        info!(
            "Offer book service started (statistics dump: {}, snapshot dumps: {})",
            config.dump_statistics,
            diagnostics.is_some()
        );

        Self {
            storage,
            bridge,
            gateway,
            snapshot,
            materializer,
            statistics,
            diagnostics,
        }
    }

    pub fn add_offer(
        &self,
        offer: &Offer,
        on_success: ResultHandler,
        on_error: ErrorMessageHandler,
    ) {
        self.gateway.add_offer(offer, on_success, on_error);
    }

    pub fn refresh_ttl(
        &self,
        payload: &Arc<OfferPayload>,
        on_success: ResultHandler,
        on_error: ErrorMessageHandler,
    ) {
        self.gateway.refresh_ttl(payload, on_success, on_error);
    }

    pub fn remove_offer(
        &self,
        payload: &Arc<OfferPayload>,
        on_success: Option<ResultHandler>,
        on_error: Option<ErrorMessageHandler>,
    ) {
        self.gateway.remove_offer(payload, on_success, on_error);
    }

    pub fn remove_offer_at_shutdown(&self, payload: &Arc<OfferPayload>) {
        self.gateway.remove_offer_at_shutdown(payload);
    }

    pub fn activate_offer(
        &self,
        offer: &Offer,
        on_success: ResultHandler,
        on_error: ErrorMessageHandler,
    ) {
        self.gateway.activate_offer(offer, on_success, on_error);
    }

    pub fn deactivate_offer(
        &self,
        payload: &Arc<OfferPayload>,
        on_success: Option<ResultHandler>,
        on_error: Option<ErrorMessageHandler>,
    ) {
        self.gateway.deactivate_offer(payload, on_success, on_error);
    }

    /// Current offers, recomputed from the network store on every call
    pub fn get_offers(&self) -> Vec<Offer> {
        self.snapshot.get_offers()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.storage.is_bootstrapped()
    }

    pub fn add_offer_book_changed_listener(&self, listener: Arc<dyn OfferBookChangedListener>) {
        self.bridge.add_offer_book_changed_listener(listener);
    }

    /// Wrap a payload as an [`Offer`] priced by this service's feed
    pub fn offer_from_payload(&self, payload: impl Into<Arc<OfferPayload>>) -> Offer {
        self.materializer.materialize(payload.into())
    }

    /// Write a raw snapshot of prices and offers
    ///
    /// Returns `Ok(None)` when snapshot dumps are not configured.
    pub fn dump_snapshot(&self) -> Result<Option<PathBuf>> {
        self.diagnostics
            .as_ref()
            .map(SnapshotDiagnostics::dump)
            .transpose()
    }

    /// State of the statistics dump, `None` when dumping is disabled
    pub fn statistics_state(&self) -> Option<DumpSchedulerState> {
        self.statistics.as_ref().map(|scheduler| scheduler.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStorageNetwork, StaticEligibility, StaticPriceFeed};
    use crate::error::OfferBookError;
    use agora_executor::ManualExecutor;

    fn build(config: OfferBookConfig) -> Result<OfferBookService> {
        OfferBookService::new(
            config,
            Arc::new(InMemoryStorageNetwork::new()),
            Arc::new(StaticPriceFeed::new()),
            Arc::new(StaticEligibility::allowed()),
            ManualExecutor::new(),
        )
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = OfferBookConfig {
            statistics_artifact: String::new(),
            ..OfferBookConfig::default()
        };

        assert!(matches!(build(config), Err(OfferBookError::Config(_))));
    }

    #[test]
    fn test_disabled_statistics_start_no_writer() {
        // Outside a runtime the JSON writer cannot start
        let dir = tempfile::tempdir().unwrap();
        let disabled = build(OfferBookConfig {
            storage_dir: dir.path().to_path_buf(),
            ..OfferBookConfig::default()
        });
        assert!(disabled.is_ok());

        let enabled = build(OfferBookConfig {
            storage_dir: dir.path().to_path_buf(),
            dump_statistics: true,
            ..OfferBookConfig::default()
        });
        assert!(matches!(enabled, Err(OfferBookError::DumpWriteFailed(_))));
    }

    #[tokio::test]
    async fn test_statistics_armed_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let disabled = build(OfferBookConfig {
            storage_dir: dir.path().to_path_buf(),
            ..OfferBookConfig::default()
        })
        .unwrap();
        assert_eq!(disabled.statistics_state(), None);

        let enabled = build(OfferBookConfig {
            storage_dir: dir.path().to_path_buf(),
            dump_statistics: true,
            ..OfferBookConfig::default()
        })
        .unwrap();
        assert_eq!(
            enabled.statistics_state(),
            Some(DumpSchedulerState::ArmedForBootstrap)
        );
        assert!(!enabled.is_bootstrapped());
    }
}
