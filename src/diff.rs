use serde_json::Value;

use crate::status::DeviceStatus;
use crate::types::Event;

/// Walks two JSON documents and records `(path, old, new)` for every leaf
/// that differs. Keys only present in `previous` are not reported.
pub(crate) fn diff_json(
    previous: &Value,
    current: &Value,
    path_prefix: &str,
    changes: &mut Vec<(String, Value, Value)>,
) {
    match (previous, current) {
        (Value::Object(prev_map), Value::Object(curr_map)) => {
            for (key, curr_val) in curr_map {
                let path = if path_prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{path_prefix}.{key}")
                };
                match prev_map.get(key) {
                    Some(prev_val) => diff_json(prev_val, curr_val, &path, changes),
                    None if curr_val.is_object() => {
                        diff_json(&Value::Object(serde_json::Map::new()), curr_val, &path, changes)
                    }
                    None => changes.push((path, Value::Null, curr_val.clone())),
                }
            }
        }
        (prev, curr) if prev != curr => {
            changes.push((path_prefix.to_string(), prev.clone(), curr.clone()));
        }
        _ => {}
    }
}

/// One event per semantic field that differs between two snapshots.
pub(crate) fn status_events(previous: &DeviceStatus, current: &DeviceStatus) -> Vec<Event> {
    let mut events = Vec::new();

    if previous.ambient_temperature != current.ambient_temperature {
        events.push(Event::AmbientTemperatureChanged {
            temp: current.ambient_temperature,
        });
    }
    if previous.target_temperature != current.target_temperature {
        events.push(Event::TargetTemperatureChanged {
            temp: current.target_temperature,
        });
    }
    if previous.water_temperature != current.water_temperature {
        events.push(Event::WaterTemperatureChanged {
            temp: current.water_temperature,
        });
    }
    if previous.power != current.power {
        events.push(Event::PowerChanged { on: current.power });
    }
    if previous.mode != current.mode {
        events.push(Event::ModeChanged { mode: current.mode });
    }
    if previous.fan_speed != current.fan_speed {
        events.push(Event::FanSpeedChanged {
            speed: current.fan_speed,
        });
    }
    if previous.rotation_enabled != current.rotation_enabled {
        events.push(Event::RotationChanged {
            enabled: current.rotation_enabled,
        });
    }
    if previous.night_mode != current.night_mode {
        events.push(Event::NightModeChanged {
            enabled: current.night_mode,
        });
    }
    if previous.scheduling_mode != current.scheduling_mode {
        events.push(Event::SchedulingChanged {
            enabled: current.scheduling_mode,
        });
    }
    if previous.keyboard_locked != current.keyboard_locked {
        events.push(Event::KeyboardLockChanged {
            locked: current.keyboard_locked,
        });
    }
    if previous.name != current.name || previous.serial != current.serial {
        events.push(Event::IdentityChanged {
            name: current.name.clone(),
            serial: current.serial.clone(),
        });
    }

    events
}
