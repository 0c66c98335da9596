//! Snapshot Query - the full current offer list, recomputed on demand

use agora_ports::StorageNetwork;
use std::sync::Arc;

use crate::materializer::OfferMaterializer;
use crate::offer::Offer;

#[derive(Clone)]
pub struct SnapshotQuery {
    storage: Arc<dyn StorageNetwork>,
    materializer: OfferMaterializer,
}

impl SnapshotQuery {
    pub fn new(storage: Arc<dyn StorageNetwork>, materializer: OfferMaterializer) -> Self {
        Self {
            storage,
            materializer,
        }
    }

    /// All offers currently in the network store
    ///
    /// Read-only: the store is queried and nothing is written anywhere. The
    /// result is a snapshot in the store's (unordered) iteration order.
    pub fn get_offers(&self) -> Vec<Offer> {
        self.storage
            .current_snapshot()
            .iter()
            .filter_map(|entry| entry.payload.as_offer())
            .map(|payload| self.materializer.materialize(payload.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStorageNetwork, StaticPriceFeed};
    use agora_core::{OfferDirection, OfferPayload, OpaquePayload, StoredEntry};
    use std::collections::HashSet;

    fn setup() -> (Arc<InMemoryStorageNetwork>, SnapshotQuery) {
        let storage = Arc::new(InMemoryStorageNetwork::new());
        let query = SnapshotQuery::new(
            storage.clone(),
            OfferMaterializer::new(Arc::new(StaticPriceFeed::new())),
        );
        (storage, query)
    }

    fn offer_entry(id: &str) -> StoredEntry {
        StoredEntry::new(
            OfferPayload::builder(OfferDirection::Sell, "EUR")
                .id(id)
                .build(),
        )
    }

    fn ids(offers: &[Offer]) -> HashSet<String> {
        offers.iter().map(|offer| offer.id().clone()).collect()
    }

    #[test]
    fn test_filters_non_offer_entries() {
        let (storage, query) = setup();
        storage.apply_remote_added(vec![
            offer_entry("id1"),
            StoredEntry::new(OpaquePayload::new("TradeStatistics", vec![7])),
            offer_entry("id2"),
        ]);

        let offers = query.get_offers();

        assert_eq!(offers.len(), 2);
        assert_eq!(ids(&offers), HashSet::from(["id1".to_string(), "id2".to_string()]));
    }

    #[test]
    fn test_repeated_calls_return_equal_snapshots() {
        let (storage, query) = setup();
        storage.apply_remote_added(vec![offer_entry("a"), offer_entry("b"), offer_entry("c")]);

        let first = query.get_offers();
        let second = query.get_offers();

        assert_eq!(ids(&first), ids(&second));
        let stored: Vec<_> = storage
            .current_snapshot()
            .into_iter()
            .filter_map(|entry| entry.payload.as_offer().cloned())
            .collect();
        for offer in &first {
            assert!(stored.contains(offer.payload()));
        }
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let (storage, query) = setup();
        storage.apply_remote_added(vec![offer_entry("a")]);
        let before = query.get_offers();

        storage.apply_remote_added(vec![offer_entry("b")]);

        assert_eq!(before.len(), 1);
        assert_eq!(query.get_offers().len(), 2);
    }

    #[test]
    fn test_query_makes_no_store_calls() {
        let (storage, query) = setup();
        storage.apply_remote_added(vec![offer_entry("a")]);

        query.get_offers();

        assert!(storage.calls().is_empty());
    }

    #[test]
    fn test_empty_store() {
        let (_, query) = setup();
        assert!(query.get_offers().is_empty());
    }
}
