//! Mutation Gateway - gated add / refresh / remove against the network store
//!
//! Every trading-affecting call consults the eligibility policy first; a
//! rejection is reported without contacting the store. Outcomes are reported
//! once through the caller's handlers. Nothing is retried here.

use agora_core::{OfferPayload, StoragePayload};
use agora_ports::{StorageNetwork, TradingEligibility};
use log::{debug, warn};
use std::sync::Arc;

use crate::error::{OfferBookError, Result, StorageOperation};
use crate::offer::Offer;

/// Called when an operation succeeded
pub type ResultHandler = Box<dyn FnOnce() + Send + 'static>;

/// Called with the reason an operation failed
pub type ErrorMessageHandler = Box<dyn FnOnce(OfferBookError) + Send + 'static>;

pub struct MutationGateway {
    storage: Arc<dyn StorageNetwork>,
    eligibility: Arc<dyn TradingEligibility>,
}

impl MutationGateway {
    pub fn new(storage: Arc<dyn StorageNetwork>, eligibility: Arc<dyn TradingEligibility>) -> Self {
        Self {
            storage,
            eligibility,
        }
    }

    /// Publish an offer to the network store
    pub fn add_offer(
        &self,
        offer: &Offer,
        on_success: ResultHandler,
        on_error: ErrorMessageHandler,
    ) {
        let result = self.try_add_offer(offer.payload());
        report(result, Some(on_success), Some(on_error));
    }

    /// Extend the time-to-live of a published offer
    pub fn refresh_ttl(
        &self,
        payload: &Arc<OfferPayload>,
        on_success: ResultHandler,
        on_error: ErrorMessageHandler,
    ) {
        let result = self.try_refresh_ttl(payload);
        report(result, Some(on_success), Some(on_error));
    }

    /// Remove an offer from the network store
    ///
    /// Handlers are optional; without them the outcome is only logged.
    pub fn remove_offer(
        &self,
        payload: &Arc<OfferPayload>,
        on_success: Option<ResultHandler>,
        on_error: Option<ErrorMessageHandler>,
    ) {
        let result = self.try_remove_offer(payload);
        report(result, on_success, on_error);
    }

    /// Same as [`MutationGateway::add_offer`]
    pub fn activate_offer(
        &self,
        offer: &Offer,
        on_success: ResultHandler,
        on_error: ErrorMessageHandler,
    ) {
        self.add_offer(offer, on_success, on_error);
    }

    /// Same as [`MutationGateway::remove_offer`]
    pub fn deactivate_offer(
        &self,
        payload: &Arc<OfferPayload>,
        on_success: Option<ResultHandler>,
        on_error: Option<ErrorMessageHandler>,
    ) {
        self.remove_offer(payload, on_success, on_error);
    }

    /// Remove an offer while shutting down; the outcome is discarded
    pub fn remove_offer_at_shutdown(&self, payload: &Arc<OfferPayload>) {
        self.remove_offer(payload, None, None);
    }

    fn check_eligibility(&self) -> Result<()> {
        if self.eligibility.requires_update_for_trading() {
            return Err(OfferBookError::GateRejected(
                self.eligibility.rejection_reason(),
            ));
        }
        Ok(())
    }

    fn try_add_offer(&self, payload: &Arc<OfferPayload>) -> Result<()> {
        self.check_eligibility()?;
        if self
            .storage
            .write_entry(StoragePayload::Offer(payload.clone()))
        {
            Ok(())
        } else {
            Err(OfferBookError::StorageWriteFailed(StorageOperation::AddOffer))
        }
    }

    fn try_refresh_ttl(&self, payload: &Arc<OfferPayload>) -> Result<()> {
        self.check_eligibility()?;
        if self
            .storage
            .refresh_ttl(StoragePayload::Offer(payload.clone()))
        {
            Ok(())
        } else {
            Err(OfferBookError::StorageWriteFailed(
                StorageOperation::RefreshTtl,
            ))
        }
    }

    fn try_remove_offer(&self, payload: &Arc<OfferPayload>) -> Result<()> {
        if self
            .storage
            .remove_entry(StoragePayload::Offer(payload.clone()))
        {
            Ok(())
        } else {
            Err(OfferBookError::StorageWriteFailed(
                StorageOperation::RemoveOffer,
            ))
        }
    }
}

fn report(
    result: Result<()>,
    on_success: Option<ResultHandler>,
    on_error: Option<ErrorMessageHandler>,
) {
    match result {
        Ok(()) => {
            if let Some(handler) = on_success {
                handler();
            }
        }
        Err(err) => {
            warn!("Offer book mutation failed: {}", err);
            match on_error {
                Some(handler) => handler(err),
                None => debug!("No error handler registered, discarding failure"),
            }
        }
    }
}
