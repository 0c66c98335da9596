use std::path::PathBuf;

use crate::error::PortResult;

/// Port for persisting JSON documents as named artifacts
pub trait ArtifactWriter: Send + Sync {
    /// Write `json` under `name` and return the resulting location
    fn write(&self, json: &str, name: &str) -> PortResult<PathBuf>;

    /// Write without blocking the caller
    ///
    /// Failures are logged by the implementation and never surfaced.
    fn write_in_background(&self, json: String, name: &str);
}
