//! Offer book errors

use agora_ports::PortError;
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// Storage operation that was attempted and refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    AddOffer,
    RefreshTtl,
    RemoveOffer,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StorageOperation::AddOffer => "Add offer failed",
            StorageOperation::RefreshTtl => "Refresh TTL failed.",
            StorageOperation::RemoveOffer => "Remove offer failed",
        };
        f.write_str(msg)
    }
}

#[derive(Error, Debug)]
pub enum OfferBookError {
    /// Trading eligibility policy refused the operation; no storage call was made
    #[error("{0}")]
    GateRejected(String),

    /// The network store refused an add, refresh or remove
    #[error("{0}")]
    StorageWriteFailed(StorageOperation),

    #[error("Could not project offer {offer_id}: {reason}")]
    MaterializationFailed { offer_id: String, reason: String },

    #[error("Dump write failed: {0}")]
    DumpWriteFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<PortError> for OfferBookError {
    fn from(err: PortError) -> Self {
        OfferBookError::DumpWriteFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OfferBookError>;
