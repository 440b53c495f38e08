use std::path::Path;

use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::portfolio::{Portfolio, Snapshot};

use super::format;

/// High-level snapshot operations: portfolio to/from text or files.
pub struct StorageManager;

impl StorageManager {
    /// Render the portfolio's balance and holdings as snapshot text.
    ///
    /// Flow: Portfolio → Snapshot → text
    pub fn save_to_string(portfolio: &Portfolio) -> String {
        format::encode(&portfolio.snapshot())
    }

    /// Parse and validate snapshot text.
    ///
    /// Flow: text → Snapshot (validated)
    pub fn load_from_str(text: &str) -> Result<Snapshot, CoreError> {
        Self::parse(text).inspect_err(|e| {
            warn!(error = %e, "snapshot rejected");
        })
    }

    /// Write the snapshot to `path`, replacing any existing file.
    pub fn save_to_file(portfolio: &Portfolio, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let text = Self::save_to_string(portfolio);
        std::fs::write(path, text)?;
        info!(
            path = %path.display(),
            holdings = portfolio.holdings().len(),
            "portfolio saved"
        );
        Ok(())
    }

    /// Read and validate a snapshot from `path`.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Snapshot, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "portfolio load failed");
            CoreError::from(e)
        })?;
        Self::parse(&text).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "snapshot rejected");
        })
    }

    fn parse(text: &str) -> Result<Snapshot, CoreError> {
        let snapshot = format::decode(text)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
