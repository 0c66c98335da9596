//! Change Listener Bridge - network store changes to offer book listeners
//!
//! ```text
//! store thread(s) ──► on_added / on_removed(batch)
//!                            │ marshal (Executor::execute)
//!                            ▼
//!                  execution context: for each entry
//!                      Offer payload ──► materialize ──► every listener
//!                      other payload ──► skipped
//! ```
//!
//! The listener registry is append-only. Each batch iterates a snapshot of
//! the registry taken when the batch starts running, in registration order,
//! so a listener added mid-batch only sees later batches.

use agora_core::{StoragePayload, StoredEntry};
use agora_ports::{Executor, StorageChangeListener, StorageNetwork};
use log::{debug, info, trace};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::listener::OfferBookChangedListener;
use crate::materializer::OfferMaterializer;

type Registry = Arc<RwLock<Vec<Arc<dyn OfferBookChangedListener>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Added,
    Removed,
}

pub struct ChangeListenerBridge {
    listeners: Registry,
}

impl ChangeListenerBridge {
    /// Create the bridge and subscribe it to the store's change stream
    ///
    /// The subscription is made exactly once, here, and never removed.
    pub fn subscribe(
        storage: &dyn StorageNetwork,
        materializer: OfferMaterializer,
        executor: Arc<dyn Executor>,
    ) -> Arc<Self> {
        let listeners: Registry = Arc::new(RwLock::new(Vec::new()));

        storage.subscribe_to_changes(Arc::new(StoreSubscription {
            listeners: listeners.clone(),
            materializer,
            executor: executor.clone(),
        }));
        info!(
            "Offer book subscribed to '{}' (dispatching on '{}')",
            storage.name(),
            executor.name()
        );

        Arc::new(Self { listeners })
    }

    /// Register a listener for all future change batches
    pub fn add_offer_book_changed_listener(&self, listener: Arc<dyn OfferBookChangedListener>) {
        let mut listeners = self.listeners.write();
        listeners.push(listener);
        debug!("Registered offer book listener #{}", listeners.len());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

/// The bridge's single subscription on the network store
struct StoreSubscription {
    listeners: Registry,
    materializer: OfferMaterializer,
    executor: Arc<dyn Executor>,
}

impl StoreSubscription {
    fn marshal(&self, entries: &[StoredEntry], change: Change) {
        if entries.is_empty() {
            return;
        }

        let entries = entries.to_vec();
        let listeners = self.listeners.clone();
        let materializer = self.materializer.clone();
        self.executor.execute(Box::new(move || {
            dispatch(&listeners, &materializer, &entries, change);
        }));
    }
}

impl StorageChangeListener for StoreSubscription {
    fn on_added(&self, entries: &[StoredEntry]) {
        self.marshal(entries, Change::Added);
    }

    fn on_removed(&self, entries: &[StoredEntry]) {
        self.marshal(entries, Change::Removed);
    }
}

/// Fan one batch out to a snapshot of the registry
fn dispatch(
    listeners: &RwLock<Vec<Arc<dyn OfferBookChangedListener>>>,
    materializer: &OfferMaterializer,
    entries: &[StoredEntry],
    change: Change,
) {
    // Cloned so listeners can register further listeners without deadlocking
    let listeners = listeners.read().clone();
    debug!(
        "{:?} batch of {} entries for {} listeners",
        change,
        entries.len(),
        listeners.len()
    );

    for entry in entries {
        match &entry.payload {
            StoragePayload::Offer(payload) => {
                let offer = materializer.materialize(payload.clone());
                for listener in &listeners {
                    match change {
                        Change::Added => listener.on_added(&offer),
                        Change::Removed => listener.on_removed(&offer),
                    }
                }
            }
            StoragePayload::Other(other) => {
                trace!("Skipping non-offer payload '{}'", other.kind);
            }
        }
    }
}
