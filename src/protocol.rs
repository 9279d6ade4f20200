use serde::Deserialize;

use crate::types::Mode;
use crate::{Error, Result};

pub const API_PREFIX: &str = "/api/v/1";

pub const CMD_STATUS: &str = "status";
pub const CMD_POWER_ON: &str = "power/on";
pub const CMD_POWER_OFF: &str = "power/off";
pub const CMD_SET_TEMP: &str = "set/setpoint";
pub const CMD_FAN_SPEED: &str = "set/fan";
pub const CMD_ROTATION: &str = "set/feature/rotation";
pub const CMD_NIGHT_MODE: &str = "set/feature/night";
pub const CMD_SCHEDULING: &str = "set/feature/scheduling";
pub const CMD_KEYBOARD_LOCK: &str = "set/feature/lock";

/// Louvre rotation codes. The device reports a wider range in `fr`;
/// only `ROTATION_ON` means the louvre is swinging.
pub const ROTATION_ON: i64 = 0;
pub const ROTATION_OFF: i64 = 7;

pub const MIN_TEMP: f64 = 16.0;
pub const MAX_TEMP: f64 = 31.0;
/// Setpoint granularity when the unit does not report one.
pub const DEFAULT_TEMP_STEP: f64 = 1.0;

pub const RESULT_SECTION: &str = "RESULT";
pub const SETUP_SECTION: &str = "setup";

/// Status keys inside `RESULT`.
pub mod keys {
    pub const AMBIENT_TEMP: &str = "t";
    pub const SETPOINT: &str = "sp";
    pub const POWER: &str = "ps";
    pub const WORKING_MODE: &str = "wm";
    pub const ROTATION: &str = "fr";
    pub const FAN_SPEED: &str = "fs";
    pub const NIGHT_MODE: &str = "nm";
    pub const SCHEDULING: &str = "cm";
    pub const KEYBOARD_LOCK: &str = "kl";
    pub const WATER_TEMP: &str = "tw";
    pub const MIN_SETPOINT: &str = "tmin";
    pub const MAX_SETPOINT: &str = "tmax";
    pub const TEMP_STEP: &str = "step";

    pub const NAME: &str = "name";
    pub const SERIAL: &str = "serial";
    pub const UID: &str = "uid";
    pub const SOFTWARE_VERSION: &str = "sw";
    pub const MODEL: &str = "model";
}

/// Working mode table: semantic mode, `wm` code, command path.
/// Lookups scan in order and the first match wins.
pub const MODE_TABLE: &[(Mode, i64, &str)] = &[
    (Mode::Cooling, 1, "set/mode/cooling"),
    (Mode::Heating, 2, "set/mode/heating"),
    (Mode::Dehumidification, 3, "set/mode/dehumidification"),
    (Mode::FanOnly, 4, "set/mode/fanonly"),
    (Mode::Auto, 5, "set/mode/auto"),
];

pub fn command_url(base_url: &str, command: &str) -> String {
    format!("{base_url}{API_PREFIX}/{command}")
}

/// Form-encodes a numeric parameter, dropping the fraction for whole values
/// so `25.0` goes out as `25`.
pub fn number_param(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn switch_param(on: bool) -> String {
    if on { "1" } else { "0" }.to_string()
}

pub fn setpoint_form(temperature: f64) -> Vec<(&'static str, String)> {
    vec![("p_temp", number_param(temperature))]
}

pub fn value_form(value: String) -> Vec<(&'static str, String)> {
    vec![("value", value)]
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    success: bool,
}

/// Parses a command acknowledgement. The body must be a JSON object with
/// `success: true`; anything else is an error.
pub fn parse_command_response(body: &str, path: &str) -> Result<()> {
    let response: CommandResponse = serde_json::from_str(body)
        .map_err(|e| Error::Protocol(format!("bad command response for {path}: {e}")))?;
    if response.success {
        Ok(())
    } else {
        Err(Error::CommandRejected(path.to_string()))
    }
}
