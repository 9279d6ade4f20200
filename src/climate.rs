//! Thermostat-style view over a [`DeviceStatus`], the shape a home-automation
//! climate entity consumes.

use serde::Serialize;

use crate::client::InnovaClient;
use crate::status::DeviceStatus;
use crate::types::Mode;

/// Degrees either side of the setpoint inside which an auto-mode unit is
/// reported idle.
pub const AUTO_HYSTERESIS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Off,
    Cool,
    Heat,
    Dry,
    FanOnly,
    HeatCool,
}

impl HvacMode {
    pub fn from_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Cooling => Some(HvacMode::Cool),
            Mode::Heating => Some(HvacMode::Heat),
            Mode::Dehumidification => Some(HvacMode::Dry),
            Mode::FanOnly => Some(HvacMode::FanOnly),
            Mode::Auto => Some(HvacMode::HeatCool),
            Mode::Unknown => None,
        }
    }

    pub fn to_mode(self) -> Option<Mode> {
        match self {
            HvacMode::Off => None,
            HvacMode::Cool => Some(Mode::Cooling),
            HvacMode::Heat => Some(Mode::Heating),
            HvacMode::Dry => Some(Mode::Dehumidification),
            HvacMode::FanOnly => Some(Mode::FanOnly),
            HvacMode::HeatCool => Some(Mode::Auto),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    Off,
    Heating,
    Cooling,
    Drying,
    Fan,
    Idle,
}

/// Display precision of temperatures, following the unit's setpoint step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Tenths,
    Halves,
    Whole,
}

impl Precision {
    pub fn degrees(self) -> f64 {
        match self {
            Precision::Tenths => 0.1,
            Precision::Halves => 0.5,
            Precision::Whole => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    None,
    Sleep,
}

pub fn hvac_mode(status: &DeviceStatus) -> HvacMode {
    if !status.power {
        return HvacMode::Off;
    }
    HvacMode::from_mode(status.mode).unwrap_or(HvacMode::Off)
}

pub fn hvac_modes(status: &DeviceStatus) -> Vec<HvacMode> {
    let mut modes = vec![HvacMode::Off];
    modes.extend(
        status
            .supported_modes()
            .iter()
            .filter_map(|m| HvacMode::from_mode(*m)),
    );
    modes
}

/// What the unit is doing right now, inferred from mode and temperatures.
pub fn hvac_action(status: &DeviceStatus) -> HvacAction {
    if !status.power {
        return HvacAction::Off;
    }

    let ambient = status.ambient_temperature;
    let target = status.target_temperature;

    match status.mode {
        Mode::Heating if ambient < target => HvacAction::Heating,
        Mode::Cooling if ambient > target => HvacAction::Cooling,
        Mode::Dehumidification => HvacAction::Drying,
        Mode::FanOnly => HvacAction::Fan,
        Mode::Auto if ambient > target + AUTO_HYSTERESIS => HvacAction::Cooling,
        Mode::Auto if ambient < target - AUTO_HYSTERESIS => HvacAction::Heating,
        _ => HvacAction::Idle,
    }
}

/// Tenth and half degree steps map to their precision; anything else is
/// shown in whole degrees.
pub fn precision(status: &DeviceStatus) -> Precision {
    let step = status.temperature_step;
    [Precision::Tenths, Precision::Halves]
        .into_iter()
        .find(|p| (p.degrees() - step).abs() < 1e-6)
        .unwrap_or(Precision::Whole)
}

pub fn preset(status: &DeviceStatus) -> Option<Preset> {
    status
        .night_mode
        .map(|on| if on { Preset::Sleep } else { Preset::None })
}

impl InnovaClient {
    /// `Off` powers the unit down. Any other mode powers it up first if
    /// needed, then switches the working mode.
    pub async fn set_hvac_mode(&self, hvac_mode: HvacMode) -> bool {
        let Some(mode) = hvac_mode.to_mode() else {
            return self.power_off().await;
        };
        if !self.status().power && !self.power_on().await {
            return false;
        }
        self.set_mode(mode).await
    }

    pub async fn set_preset(&self, preset: Preset) -> bool {
        self.set_night_mode(preset == Preset::Sleep).await
    }
}
