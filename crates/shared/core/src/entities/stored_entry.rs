use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::OfferPayload;
use crate::values::Timestamp;

/// Payload kinds other than offers (mailbox messages, alerts, statistics, ...)
///
/// The offer book never looks inside these; it only needs to tell them apart
/// from offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpaquePayload {
    /// Protocol-level name of the payload type
    pub kind: String,
    pub data: Vec<u8>,
}

impl OpaquePayload {
    pub fn new(kind: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// Data carried by a stored entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoragePayload {
    Offer(Arc<OfferPayload>),
    Other(OpaquePayload),
}

impl StoragePayload {
    /// The offer payload, if this entry carries one
    pub fn as_offer(&self) -> Option<&Arc<OfferPayload>> {
        match self {
            StoragePayload::Offer(payload) => Some(payload),
            StoragePayload::Other(_) => None,
        }
    }
}

impl From<OfferPayload> for StoragePayload {
    fn from(payload: OfferPayload) -> Self {
        StoragePayload::Offer(Arc::new(payload))
    }
}

impl From<Arc<OfferPayload>> for StoragePayload {
    fn from(payload: Arc<OfferPayload>) -> Self {
        StoragePayload::Offer(payload)
    }
}

impl From<OpaquePayload> for StoragePayload {
    fn from(payload: OpaquePayload) -> Self {
        StoragePayload::Other(payload)
    }
}

/// An entry of the replicated network store
///
/// Lifecycle is controlled by the storage layer; consumers only read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredEntry {
    pub payload: StoragePayload,
    /// Incremented by the owner on every republish
    pub sequence_number: u32,
    pub created_at: Timestamp,
}

impl StoredEntry {
    pub fn new(payload: impl Into<StoragePayload>) -> Self {
        Self {
            payload: payload.into(),
            sequence_number: 1,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OfferDirection;

    #[test]
    fn test_payload_discrimination() {
        let offer = StoredEntry::new(OfferPayload::builder(OfferDirection::Buy, "USD").build());
        let other = StoredEntry::new(OpaquePayload::new("MailboxStoragePayload", vec![1, 2, 3]));

        assert!(offer.payload.as_offer().is_some());
        assert!(other.payload.as_offer().is_none());
    }
}
