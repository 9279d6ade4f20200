use serde::Serialize;

use crate::protocol::MODE_TABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cooling,
    Heating,
    Dehumidification,
    FanOnly,
    Auto,
    #[default]
    Unknown,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Cooling,
        Mode::Heating,
        Mode::Dehumidification,
        Mode::FanOnly,
        Mode::Auto,
    ];

    /// Decodes a `wm` code. Unrecognized codes yield `Unknown`.
    pub fn from_code(code: i64) -> Self {
        MODE_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(mode, _, _)| *mode)
            .unwrap_or(Mode::Unknown)
    }

    pub fn code(&self) -> Option<i64> {
        MODE_TABLE
            .iter()
            .find(|(mode, _, _)| mode == self)
            .map(|(_, code, _)| *code)
    }

    pub fn command_path(&self) -> Option<&'static str> {
        MODE_TABLE
            .iter()
            .find(|(mode, _, _)| mode == self)
            .map(|(_, _, path)| *path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [FanSpeed::Auto, FanSpeed::Low, FanSpeed::Medium, FanSpeed::High];

    /// Decodes an `fs` code. Codes outside 0..=3 have no speed.
    pub fn from_code(code: i64) -> Option<Self> {
        FanSpeed::ALL.into_iter().find(|speed| speed.code() == code)
    }

    /// Wire value sent in the `value` form field of `set/fan`.
    pub fn code(&self) -> i64 {
        match self {
            FanSpeed::Auto => 0,
            FanSpeed::Low => 1,
            FanSpeed::Medium => 2,
            FanSpeed::High => 3,
        }
    }
}

/// Which optional control surfaces this unit has, judged from the keys
/// present in its last status payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub target_temperature: bool,
    pub fan: bool,
    pub swing: bool,
    pub preset: bool,
    pub water_temperature: bool,
    pub keyboard_lock: bool,
    pub scheduling: bool,
}

/// Emitted by the client when a field of the cached status changes,
/// either through a refresh or an acknowledged command.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AmbientTemperatureChanged { temp: f64 },
    TargetTemperatureChanged { temp: f64 },
    WaterTemperatureChanged { temp: Option<f64> },
    PowerChanged { on: bool },
    ModeChanged { mode: Mode },
    FanSpeedChanged { speed: Option<FanSpeed> },
    RotationChanged { enabled: bool },
    NightModeChanged { enabled: Option<bool> },
    SchedulingChanged { enabled: Option<bool> },
    KeyboardLockChanged { locked: Option<bool> },
    IdentityChanged { name: Option<String>, serial: Option<String> },
}
