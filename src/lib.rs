mod client;
mod climate;
mod config;
mod coordinator;
mod diff;
mod error;
mod logger;
mod protocol;
mod status;
mod types;

pub use client::{InnovaClient, InnovaClientBuilder, DEFAULT_REQUEST_TIMEOUT};
pub use climate::{
    hvac_action, hvac_mode, hvac_modes, precision, preset, HvacAction, HvacMode, Precision, Preset,
    AUTO_HYSTERESIS,
};
pub use config::{Options, DEFAULT_SCAN_INTERVAL_SECS, MAX_SCAN_INTERVAL_SECS, MIN_SCAN_INTERVAL_SECS};
pub use coordinator::{Coordinator, StatusSource, SyncState, UpdateResult};
pub use error::{Error, Result, UpdateFailed};
pub use logger::MessageLogMode;
pub use protocol::{DEFAULT_TEMP_STEP, MAX_TEMP, MIN_TEMP, ROTATION_OFF, ROTATION_ON};
pub use status::DeviceStatus;
pub use types::*;
