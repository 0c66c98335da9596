//! Offer book change listeners

use crate::offer::Offer;

/// Receives offers added to or removed from the offer book
///
/// Called on the offer book's execution context, once per offer entry of a
/// change batch.
pub trait OfferBookChangedListener: Send + Sync {
    fn on_added(&self, offer: &Offer);

    fn on_removed(&self, offer: &Offer);
}

/// Listener built from a pair of closures
pub struct FnListener<A, R>
where
    A: Fn(&Offer) + Send + Sync,
    R: Fn(&Offer) + Send + Sync,
{
    on_added: A,
    on_removed: R,
}

impl<A, R> FnListener<A, R>
where
    A: Fn(&Offer) + Send + Sync,
    R: Fn(&Offer) + Send + Sync,
{
    pub fn new(on_added: A, on_removed: R) -> Self {
        Self {
            on_added,
            on_removed,
        }
    }
}

impl<A, R> OfferBookChangedListener for FnListener<A, R>
where
    A: Fn(&Offer) + Send + Sync,
    R: Fn(&Offer) + Send + Sync,
{
    fn on_added(&self, offer: &Offer) {
        (self.on_added)(offer)
    }

    fn on_removed(&self, offer: &Offer) {
        (self.on_removed)(offer)
    }
}
