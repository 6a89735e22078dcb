//! Local persistence of the user's holdings.
//!
//! The quantity is stored as a plain-text float with eight decimals in a
//! single file under the per-user application data directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::Result;

/// File name of the holdings record inside the data directory.
pub const HOLDINGS_FILE: &str = "holdings.txt";

/// Reads and writes the holdings quantity.
#[derive(Clone, Debug)]
pub struct HoldingsStore {
    path: PathBuf,
}

impl HoldingsStore {
    /// Creates a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `holdings.txt` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(HOLDINGS_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored quantity.
    ///
    /// A missing or unreadable file, or content that does not parse as a
    /// float, yields `0.0`.
    pub fn load(&self) -> f64 {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No holdings file, using 0");
                return 0.0;
            }
        };

        match content.trim().parse::<f64>() {
            Ok(quantity) => quantity,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Unparseable holdings file, using 0");
                0.0
            }
        }
    }

    /// Overwrites the stored quantity, creating the parent directory first.
    ///
    /// # Errors
    ///
    /// Returns [`BtcBarError::Io`](crate::BtcBarError::Io) if the directory
    /// cannot be created or the file cannot be written.
    pub fn save(&self, quantity: f64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{quantity:.8}"))?;
        info!(path = %self.path.display(), quantity, "Saved holdings");

        Ok(())
    }
}

/// Parses user-entered holdings text.
///
/// Surrounding whitespace is ignored. Negative, NaN and infinite values are
/// rejected.
pub fn parse_holdings_input(text: &str) -> Option<f64> {
    let quantity = text.trim().parse::<f64>().ok()?;
    (quantity.is_finite() && quantity >= 0.0).then_some(quantity)
}
