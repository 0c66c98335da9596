use std::sync::Arc;

use agora_core::{StoragePayload, StoredEntry};

/// Callback fired once the initial data set has been received
pub type BootstrapCallback = Box<dyn FnOnce() + Send + 'static>;

/// Receives change batches from the network store
///
/// Implementations may be called from any of the store's threads.
pub trait StorageChangeListener: Send + Sync {
    /// Entries that appeared in the store (remote or local write)
    fn on_added(&self, entries: &[StoredEntry]);

    /// Entries that left the store (remote or local remove, TTL expiry)
    fn on_removed(&self, entries: &[StoredEntry]);
}

/// Port for the replicated, eventually-consistent network store
///
/// Write operations report acceptance by the local store only; they do not
/// wait for network-level confirmation.
pub trait StorageNetwork: Send + Sync {
    /// Register for add/remove change batches
    fn subscribe_to_changes(&self, listener: Arc<dyn StorageChangeListener>);

    /// Publish a payload; returns false if the store rejected it
    fn write_entry(&self, payload: StoragePayload) -> bool;

    /// Remove a previously published payload
    fn remove_entry(&self, payload: StoragePayload) -> bool;

    /// Extend the time-to-live of a published payload
    fn refresh_ttl(&self, payload: StoragePayload) -> bool;

    /// Current full data view (unordered)
    fn current_snapshot(&self) -> Vec<StoredEntry>;

    /// True once the initial data set has been received
    fn is_bootstrapped(&self) -> bool;

    /// Run `callback` once the initial data set has been received
    ///
    /// Fires at most once. If the store is already bootstrapped the callback
    /// runs immediately.
    fn on_bootstrap_data_received(&self, callback: BootstrapCallback);

    /// Get the store's name/identifier for debugging
    fn name(&self) -> &str {
        "StorageNetwork"
    }
}
