use serde::{Deserialize, Serialize};
use std::fmt;

/// Offer direction, seen from the maker's side of the base asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferDirection {
    Buy,
    Sell,
}

impl OfferDirection {
    /// The opposite direction
    pub fn mirrored(&self) -> Self {
        match self {
            OfferDirection::Buy => OfferDirection::Sell,
            OfferDirection::Sell => OfferDirection::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferDirection::Buy => "BUY",
            OfferDirection::Sell => "SELL",
        }
    }
}

impl fmt::Display for OfferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored() {
        assert_eq!(OfferDirection::Buy.mirrored(), OfferDirection::Sell);
        assert_eq!(OfferDirection::Sell.mirrored(), OfferDirection::Buy);
    }

    #[test]
    fn test_serializes_uppercase() {
        let json = serde_json::to_string(&OfferDirection::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
        assert_eq!(OfferDirection::Buy.to_string(), "BUY");
    }
}
