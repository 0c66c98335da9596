//! Raw snapshot dumps for offline inspection
//!
//! Each dump claims a new directory named after the current UTC time:
//!
//! ```text
//! <root>/2026-10-16_09-30-00.123/
//!     marketPrice.json          market prices of the configured currencies
//!     offers/<offer id>.json    one file per current offer payload
//! ```
//!
//! Dumps within the same millisecond get a `-1`, `-2`, ... suffix, so every
//! directory holds exactly one snapshot.

use agora_core::MarketPrice;
use agora_ports::{PortError, PortResult, PriceFeed};
use chrono::Utc;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::write_json_file;
use crate::error::Result;
use crate::offer::Offer;
use crate::snapshot::SnapshotQuery;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.3f";
const MARKET_PRICE_ARTIFACT: &str = "marketPrice";
const OFFERS_DIR: &str = "offers";

pub struct SnapshotDiagnostics {
    root: PathBuf,
    currencies: Vec<String>,
    snapshot: SnapshotQuery,
    price_feed: Arc<dyn PriceFeed>,
}

impl SnapshotDiagnostics {
    pub fn new(
        root: impl Into<PathBuf>,
        currencies: Vec<String>,
        snapshot: SnapshotQuery,
        price_feed: Arc<dyn PriceFeed>,
    ) -> Self {
        Self {
            root: root.into(),
            currencies,
            snapshot,
            price_feed,
        }
    }

    /// Write the current market prices and offers, returning the dump directory
    ///
    /// Currencies without a price are left out. Offers that cannot be
    /// serialized or whose id cannot be used as a file name are skipped with
    /// a warning.
    pub fn dump(&self) -> Result<PathBuf> {
        let dir = self.claim_dump_dir()?;

        let prices: Vec<MarketPrice> = self
            .currencies
            .iter()
            .filter_map(|code| self.price_feed.market_price(code))
            .collect();
        let json = serde_json::to_string_pretty(&prices).map_err(PortError::from)?;
        write_json_file(&dir, MARKET_PRICE_ARTIFACT, &json)?;

        let offers_dir = dir.join(OFFERS_DIR);
        fs::create_dir(&offers_dir).map_err(PortError::from)?;
        let offers = self.snapshot.get_offers();
        let written = offers
            .iter()
            .filter(|offer| match write_offer(&offers_dir, offer) {
                Ok(()) => true,
                Err(err) => {
                    warn!("Skipping offer {} in snapshot dump: {}", offer.id(), err);
                    false
                }
            })
            .count();

        debug!(
            "Snapshot dump of {} prices and {}/{} offers written to {}",
            prices.len(),
            written,
            offers.len(),
            dir.display()
        );
        Ok(dir)
    }

    /// Create a directory no earlier dump has used
    fn claim_dump_dir(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).map_err(PortError::from)?;
        let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => stamp.clone(),
                n => format!("{}-{}", stamp, n),
            };
            let dir = self.root.join(name);
            match fs::create_dir(&dir) {
                Ok(()) => return Ok(dir),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(PortError::from(err).into()),
            }
        }
    }
}

fn write_offer(dir: &Path, offer: &Offer) -> PortResult<()> {
    let json = serde_json::to_string_pretty(offer.payload().as_ref())?;
    write_json_file(dir, offer.id(), &json)?;
    Ok(())
}
