use agora_core::{StoragePayload, StoredEntry};
use agora_ports::{BootstrapCallback, StorageChangeListener, StorageNetwork};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A mutating call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Write(StoragePayload),
    Remove(StoragePayload),
    RefreshTtl(StoragePayload),
}

/// Single-process network store
///
/// Local writes and removes notify subscribers like the replicated store
/// does. `apply_remote_*` simulate batches arriving from peers, and every
/// mutating call is recorded for inspection.
pub struct InMemoryStorageNetwork {
    entries: DashMap<StoragePayload, StoredEntry>,
    listeners: RwLock<Vec<Arc<dyn StorageChangeListener>>>,
    bootstrapped: AtomicBool,
    bootstrap_callbacks: Mutex<Vec<BootstrapCallback>>,
    reject_writes: AtomicBool,
    calls: Mutex<Vec<StorageCall>>,
}

impl InMemoryStorageNetwork {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            listeners: RwLock::new(Vec::new()),
            bootstrapped: AtomicBool::new(false),
            bootstrap_callbacks: Mutex::new(Vec::new()),
            reject_writes: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every write, remove and refresh fail
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Mark the initial data set as received, firing pending bootstrap callbacks once
    pub fn set_bootstrapped(&self) {
        let callbacks = {
            let mut pending = self.bootstrap_callbacks.lock();
            if self.bootstrapped.swap(true, Ordering::SeqCst) {
                return;
            }
            std::mem::take(&mut *pending)
        };

        debug!("Store bootstrapped, firing {} callbacks", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }

    /// Entries published by peers
    pub fn apply_remote_added(&self, entries: Vec<StoredEntry>) {
        let added: Vec<StoredEntry> = entries
            .into_iter()
            .filter(|entry| self.insert_new(entry.clone()))
            .collect();
        self.notify_added(&added);
    }

    /// Entries removed by peers or expired
    pub fn apply_remote_removed(&self, entries: Vec<StoredEntry>) {
        let removed: Vec<StoredEntry> = entries
            .into_iter()
            .filter_map(|entry| self.entries.remove(&entry.payload).map(|(_, stored)| stored))
            .collect();
        self.notify_removed(&removed);
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Mutating calls in the order they were made
    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.count(|call| matches!(call, StorageCall::Write(_)))
    }

    pub fn remove_count(&self) -> usize {
        self.count(|call| matches!(call, StorageCall::Remove(_)))
    }

    pub fn refresh_count(&self) -> usize {
        self.count(|call| matches!(call, StorageCall::RefreshTtl(_)))
    }

    fn count(&self, predicate: impl Fn(&StorageCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Insert unless an entry with the same payload exists
    fn insert_new(&self, entry: StoredEntry) -> bool {
        match self.entries.entry(entry.payload.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    fn record(&self, call: StorageCall) -> bool {
        self.calls.lock().push(call);
        !self.reject_writes.load(Ordering::SeqCst)
    }

    fn subscribers(&self) -> Vec<Arc<dyn StorageChangeListener>> {
        self.listeners.read().clone()
    }

    fn notify_added(&self, entries: &[StoredEntry]) {
        for listener in self.subscribers() {
            listener.on_added(entries);
        }
    }

    fn notify_removed(&self, entries: &[StoredEntry]) {
        for listener in self.subscribers() {
            listener.on_removed(entries);
        }
    }
}

impl Default for InMemoryStorageNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageNetwork for InMemoryStorageNetwork {
    fn subscribe_to_changes(&self, listener: Arc<dyn StorageChangeListener>) {
        self.listeners.write().push(listener);
    }

    fn write_entry(&self, payload: StoragePayload) -> bool {
        if !self.record(StorageCall::Write(payload.clone())) {
            return false;
        }
        let entry = StoredEntry::new(payload);
        if !self.insert_new(entry.clone()) {
            return false;
        }
        self.notify_added(&[entry]);
        true
    }

    fn remove_entry(&self, payload: StoragePayload) -> bool {
        if !self.record(StorageCall::Remove(payload.clone())) {
            return false;
        }
        match self.entries.remove(&payload) {
            Some((_, entry)) => {
                self.notify_removed(&[entry]);
                true
            }
            None => false,
        }
    }

    fn refresh_ttl(&self, payload: StoragePayload) -> bool {
        if !self.record(StorageCall::RefreshTtl(payload.clone())) {
            return false;
        }
        self.entries.contains_key(&payload)
    }

    fn current_snapshot(&self) -> Vec<StoredEntry> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst)
    }

    fn on_bootstrap_data_received(&self, callback: BootstrapCallback) {
        let mut pending = self.bootstrap_callbacks.lock();
        if self.bootstrapped.load(Ordering::SeqCst) {
            drop(pending);
            callback();
        } else {
            pending.push(callback);
        }
    }

    fn name(&self) -> &str {
        "InMemoryStorageNetwork"
    }
}
