use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 600;
pub const MIN_SCAN_INTERVAL_SECS: u64 = 10;
pub const MAX_SCAN_INTERVAL_SECS: u64 = 86_400;

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

/// Integration options as kept by the host platform's options store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Options {
    pub host: String,
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
}

impl Options {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS,
        }
    }

    pub fn with_scan_interval(mut self, secs: u64) -> Self {
        self.scan_interval = secs;
        self
    }

    /// Reads options from a key-value map and validates them.
    pub fn from_value(value: &Value) -> Result<Self> {
        let options = Options::deserialize(value).map_err(|e| Error::InvalidOption(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidOption("host must not be empty".to_string()));
        }
        if !(MIN_SCAN_INTERVAL_SECS..=MAX_SCAN_INTERVAL_SECS).contains(&self.scan_interval) {
            return Err(Error::InvalidOption(format!(
                "scan_interval {} not in {MIN_SCAN_INTERVAL_SECS}..={MAX_SCAN_INTERVAL_SECS}",
                self.scan_interval
            )));
        }
        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval)
    }
}
