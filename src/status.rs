use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::{
    keys, DEFAULT_TEMP_STEP, MAX_TEMP, MIN_TEMP, RESULT_SECTION, ROTATION_ON, SETUP_SECTION,
};
use crate::types::{Capabilities, FanSpeed, Mode};

/// `RESULT` keys whose presence gates an optional capability.
const CAPABILITY_SCHEMA: &[(&str, fn(&mut Capabilities))] = &[
    (keys::SETPOINT, |c| c.target_temperature = true),
    (keys::FAN_SPEED, |c| c.fan = true),
    (keys::ROTATION, |c| c.swing = true),
    (keys::NIGHT_MODE, |c| c.preset = true),
    (keys::WATER_TEMP, |c| c.water_temperature = true),
    (keys::KEYBOARD_LOCK, |c| c.keyboard_lock = true),
    (keys::SCHEDULING, |c| c.scheduling = true),
];

/// Snapshot of one unit, decoded from a `GET /status` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub ambient_temperature: f64,
    pub target_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub temperature_step: f64,
    pub water_temperature: Option<f64>,
    pub power: bool,
    pub mode: Mode,
    pub rotation_enabled: bool,
    pub fan_speed: Option<FanSpeed>,
    pub night_mode: Option<bool>,
    pub scheduling_mode: Option<bool>,
    pub keyboard_locked: Option<bool>,
    pub name: Option<String>,
    pub serial: Option<String>,
    pub uid: Option<String>,
    pub software_version: Option<String>,
    pub model: Option<String>,
    pub capabilities: Capabilities,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            ambient_temperature: 0.0,
            target_temperature: 0.0,
            min_temperature: MIN_TEMP,
            max_temperature: MAX_TEMP,
            temperature_step: DEFAULT_TEMP_STEP,
            water_temperature: None,
            power: false,
            mode: Mode::Unknown,
            rotation_enabled: false,
            fan_speed: None,
            night_mode: None,
            scheduling_mode: None,
            keyboard_locked: None,
            name: None,
            serial: None,
            uid: None,
            software_version: None,
            model: None,
            capabilities: Capabilities::default(),
        }
    }
}

impl DeviceStatus {
    /// Decodes a raw status payload. Never fails: missing or malformed keys
    /// fall back to the field default.
    pub fn parse(raw: &Value) -> Self {
        let empty = Map::new();
        let result = raw
            .get(RESULT_SECTION)
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let setup = raw
            .get(SETUP_SECTION)
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let defaults = Self::default();

        Self {
            ambient_temperature: number(result.get(keys::AMBIENT_TEMP))
                .unwrap_or(defaults.ambient_temperature),
            target_temperature: number(result.get(keys::SETPOINT))
                .unwrap_or(defaults.target_temperature),
            min_temperature: number(result.get(keys::MIN_SETPOINT))
                .unwrap_or(defaults.min_temperature),
            max_temperature: number(result.get(keys::MAX_SETPOINT))
                .unwrap_or(defaults.max_temperature),
            temperature_step: number(result.get(keys::TEMP_STEP))
                .filter(|step| *step > 0.0)
                .unwrap_or(defaults.temperature_step),
            water_temperature: number(result.get(keys::WATER_TEMP)),
            power: integer(result.get(keys::POWER)) == Some(1),
            mode: integer(result.get(keys::WORKING_MODE))
                .map(Mode::from_code)
                .unwrap_or(Mode::Unknown),
            rotation_enabled: integer(result.get(keys::ROTATION)) == Some(ROTATION_ON),
            fan_speed: integer(result.get(keys::FAN_SPEED)).and_then(FanSpeed::from_code),
            night_mode: flag(result.get(keys::NIGHT_MODE)),
            scheduling_mode: flag(result.get(keys::SCHEDULING)),
            keyboard_locked: flag(result.get(keys::KEYBOARD_LOCK)),
            name: text(setup.get(keys::NAME)),
            serial: text(setup.get(keys::SERIAL)),
            uid: text(setup.get(keys::UID)),
            software_version: text(setup.get(keys::SOFTWARE_VERSION)),
            model: text(setup.get(keys::MODEL)),
            capabilities: detect_capabilities(result),
        }
    }

    /// Serial number, or the uid when the unit reports no serial.
    pub fn unique_id(&self) -> Option<&str> {
        self.serial.as_deref().or(self.uid.as_deref())
    }

    pub fn supports_target_temperature(&self) -> bool {
        self.capabilities.target_temperature
    }

    pub fn supports_fan(&self) -> bool {
        self.capabilities.fan
    }

    pub fn supports_swing(&self) -> bool {
        self.capabilities.swing
    }

    pub fn supports_preset(&self) -> bool {
        self.capabilities.preset
    }

    pub fn supports_water_temperature(&self) -> bool {
        self.capabilities.water_temperature
    }

    pub fn supports_keyboard_lock(&self) -> bool {
        self.capabilities.keyboard_lock
    }

    pub fn supports_scheduling(&self) -> bool {
        self.capabilities.scheduling
    }

    pub fn supported_modes(&self) -> &'static [Mode] {
        &Mode::ALL
    }

    pub fn supported_fan_speeds(&self) -> &'static [FanSpeed] {
        if self.supports_fan() { &FanSpeed::ALL } else { &[] }
    }
}

fn detect_capabilities(result: &Map<String, Value>) -> Capabilities {
    let mut caps = Capabilities::default();
    for (key, mark) in CAPABILITY_SCHEMA {
        if result.contains_key(*key) {
            mark(&mut caps);
        }
    }
    caps
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        other => integer(Some(other)).map(|n| n != 0),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}
