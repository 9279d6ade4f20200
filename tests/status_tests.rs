use innova_hvac::{
    precision, DeviceStatus, FanSpeed, Mode, Precision, DEFAULT_TEMP_STEP, MAX_TEMP, MIN_TEMP, ROTATION_OFF,
    ROTATION_ON,
};
use serde_json::{json, Map, Value};

const KNOWN_KEYS: [(&str, i64); 6] = [("t", 21), ("sp", 23), ("ps", 1), ("wm", 2), ("fr", 7), ("fs", 1)];

#[test]
fn scenario_payload() {
    let status = DeviceStatus::parse(&json!({"RESULT": {"t": 21, "sp": 23, "ps": 1, "wm": 2, "fr": 7, "fs": 1}}));
    assert_eq!(status.ambient_temperature, 21.0);
    assert_eq!(status.target_temperature, 23.0);
    assert!(status.power);
    assert_eq!(status.mode, Mode::Heating);
    assert!(!status.rotation_enabled);
    assert_eq!(status.fan_speed, Some(FanSpeed::Low));
}

#[test]
fn missing_result_is_empty_status() {
    for raw in [json!({}), json!({"RESULT": {}}), json!({"setup": {"name": "x"}})] {
        let status = DeviceStatus::parse(&raw);
        assert!(!status.power);
        assert_eq!(status.mode, Mode::Unknown);
        assert_eq!(status.ambient_temperature, 0.0);
        assert_eq!(status.target_temperature, 0.0);
        assert_eq!(status.min_temperature, MIN_TEMP);
        assert_eq!(status.max_temperature, MAX_TEMP);
    }
}

#[test]
fn any_subset_of_keys_parses_to_defaults_for_the_rest() {
    for mask in 0u32..(1 << KNOWN_KEYS.len()) {
        let mut result = Map::new();
        for (i, (key, value)) in KNOWN_KEYS.iter().enumerate() {
            if mask & (1 << i) != 0 {
                result.insert(key.to_string(), Value::from(*value));
            }
        }
        let has = |key: &str| result.contains_key(key);

        let status = DeviceStatus::parse(&json!({ "RESULT": result }));
        assert_eq!(status.ambient_temperature, if has("t") { 21.0 } else { 0.0 });
        assert_eq!(status.target_temperature, if has("sp") { 23.0 } else { 0.0 });
        assert_eq!(status.power, has("ps"));
        assert_eq!(status.mode, if has("wm") { Mode::Heating } else { Mode::Unknown });
        assert!(!status.rotation_enabled);
        assert_eq!(status.fan_speed, has("fs").then_some(FanSpeed::Low));
        assert_eq!(status.supports_fan(), has("fs"));
        assert_eq!(status.supports_swing(), has("fr"));
        assert_eq!(status.supports_target_temperature(), has("sp"));
    }
}

#[test]
fn rotation_projection() {
    let rotation = |code: i64| DeviceStatus::parse(&json!({"RESULT": {"fr": code}})).rotation_enabled;
    assert!(rotation(ROTATION_ON));
    assert!(!rotation(ROTATION_OFF));
    for other in [1, 2, 3, 6, 8, -1] {
        assert!(!rotation(other), "code {other} is not swinging");
    }
}

#[test]
fn mode_codes() {
    let mode = |code: i64| DeviceStatus::parse(&json!({"RESULT": {"wm": code}})).mode;
    assert_eq!(mode(1), Mode::Cooling);
    assert_eq!(mode(2), Mode::Heating);
    assert_eq!(mode(3), Mode::Dehumidification);
    assert_eq!(mode(4), Mode::FanOnly);
    assert_eq!(mode(5), Mode::Auto);
    assert_eq!(mode(0), Mode::Unknown);
    assert_eq!(mode(6), Mode::Unknown);
}

#[test]
fn mode_table_is_symmetric() {
    for code in 1..=5 {
        let mode = Mode::from_code(code);
        assert_ne!(mode, Mode::Unknown);
        assert_eq!(mode.code(), Some(code));
        assert!(mode.command_path().unwrap().starts_with("set/mode/"));
    }
    assert_eq!(Mode::Unknown.code(), None);
    assert_eq!(Mode::Unknown.command_path(), None);
}

#[test]
fn fan_speed_codes() {
    let speed = |code: i64| DeviceStatus::parse(&json!({"RESULT": {"fs": code}})).fan_speed;
    assert_eq!(speed(0), Some(FanSpeed::Auto));
    assert_eq!(speed(1), Some(FanSpeed::Low));
    assert_eq!(speed(2), Some(FanSpeed::Medium));
    assert_eq!(speed(3), Some(FanSpeed::High));
    assert_eq!(speed(4), None);
    assert_eq!(speed(-1), None);

    for fan in FanSpeed::ALL {
        assert_eq!(FanSpeed::from_code(fan.code()), Some(fan));
    }
}

#[test]
fn power_is_on_only_for_one() {
    let power = |v: Value| DeviceStatus::parse(&json!({"RESULT": {"ps": v}})).power;
    assert!(power(json!(1)));
    assert!(!power(json!(0)));
    assert!(!power(json!(2)));
}

#[test]
fn temperature_step_from_payload() {
    let fine = DeviceStatus::parse(&json!({"RESULT": {"sp": 22.5, "step": 0.5}}));
    assert_eq!(fine.temperature_step, 0.5);
    assert_eq!(precision(&fine), Precision::Halves);

    let plain = DeviceStatus::parse(&json!({"RESULT": {"sp": 22}}));
    assert_eq!(plain.temperature_step, DEFAULT_TEMP_STEP);
    assert_eq!(precision(&plain), Precision::Whole);
}

#[test]
fn setup_section_identity() {
    let status = DeviceStatus::parse(&json!({
        "RESULT": {},
        "setup": {"name": "Bedroom", "serial": "IN-77", "uid": "a4:cf:12:34:56:78", "sw": "2.0.1", "model": "2.0 12HP"}
    }));
    assert_eq!(status.name.as_deref(), Some("Bedroom"));
    assert_eq!(status.serial.as_deref(), Some("IN-77"));
    assert_eq!(status.uid.as_deref(), Some("a4:cf:12:34:56:78"));
    assert_eq!(status.software_version.as_deref(), Some("2.0.1"));
    assert_eq!(status.model.as_deref(), Some("2.0 12HP"));
    assert_eq!(status.unique_id(), Some("IN-77"));
}

#[test]
fn capabilities_gate_optional_features() {
    let bare = DeviceStatus::parse(&json!({"RESULT": {"t": 20, "ps": 1}}));
    assert!(!bare.supports_fan());
    assert!(!bare.supports_preset());
    assert!(!bare.supports_water_temperature());
    assert!(!bare.supports_keyboard_lock());
    assert!(bare.supported_fan_speeds().is_empty());
    assert_eq!(bare.night_mode, None);

    let full = DeviceStatus::parse(&json!({"RESULT": {"fs": 0, "nm": 1, "tw": 42.5, "kl": 1, "cm": 0}}));
    assert!(full.supports_fan());
    assert!(full.supports_preset());
    assert!(full.supports_water_temperature());
    assert!(full.supports_keyboard_lock());
    assert!(full.supports_scheduling());
    assert_eq!(full.supported_fan_speeds().len(), 4);
    assert_eq!(full.night_mode, Some(true));
    assert_eq!(full.water_temperature, Some(42.5));
    assert_eq!(full.keyboard_locked, Some(true));
    assert_eq!(full.scheduling_mode, Some(false));
}

#[test]
fn status_serializes_with_semantic_names() {
    let status = DeviceStatus::parse(&json!({"RESULT": {"wm": 4, "fs": 2}}));
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value["mode"], "fanonly");
    assert_eq!(value["fan_speed"], "medium");
}
