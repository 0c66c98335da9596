use agora_ports::TradingEligibility;
use parking_lot::RwLock;

/// Eligibility policy switched on and off by the application
pub struct StaticEligibility {
    /// Rejection reason while trading is blocked
    blocked: RwLock<Option<String>>,
}

impl StaticEligibility {
    pub fn allowed() -> Self {
        Self {
            blocked: RwLock::new(None),
        }
    }

    /// Refuse trading with the given reason
    pub fn block(&self, reason: impl Into<String>) {
        *self.blocked.write() = Some(reason.into());
    }

    pub fn allow(&self) {
        *self.blocked.write() = None;
    }
}

impl Default for StaticEligibility {
    fn default() -> Self {
        Self::allowed()
    }
}

impl TradingEligibility for StaticEligibility {
    fn requires_update_for_trading(&self) -> bool {
        self.blocked.read().is_some()
    }

    fn rejection_reason(&self) -> String {
        self.blocked.read().clone().unwrap_or_default()
    }
}
