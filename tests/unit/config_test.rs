//! Tests for configuration validation

use std::time::Duration;

use pet_elevator::{ElevatorConfig, LoadPolicy};

#[test]
fn test_default_config_is_valid() {
    let config = ElevatorConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.load_policy, LoadPolicy::SkipOverweight);
    assert_eq!(config.max_waiting, 1024);
}

#[test]
fn test_config_invalid_floors() {
    assert!(ElevatorConfig::new().with_floors(1).validate().is_err());
    assert!(ElevatorConfig::new().with_floors(2).validate().is_ok());
}

#[test]
fn test_config_invalid_max_pets() {
    assert!(ElevatorConfig::new().with_max_pets(0).validate().is_err());
}

#[test]
fn test_config_invalid_zero_time_unit() {
    let config = ElevatorConfig::new().with_time_unit(Duration::from_micros(10));
    assert_eq!(config.time_unit_ms, 0);
    assert!(config.validate().is_err());
}

#[test]
fn test_config_invalid_max_waiting() {
    assert!(ElevatorConfig::new().with_max_waiting(0).validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "floors": 10,
        "max_pets": 3,
        "max_weight": 30,
        "time_unit_ms": 5,
        "load_policy": "stop_at_overweight"
    }"#;
    let config = ElevatorConfig::from_json_str(json).unwrap();
    assert_eq!(config.floors, 10);
    assert_eq!(config.max_pets, 3);
    assert_eq!(config.transit_delay(), Duration::from_millis(10));
    assert_eq!(config.load_policy, LoadPolicy::StopAtOverweight);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(ElevatorConfig::from_json_str(r#"{ "max_weight": 10 }"#).is_err());
    assert!(ElevatorConfig::from_json_str(r#"{ "load_policy": "whenever" }"#).is_err());
    assert!(ElevatorConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_serde_round_trip_keeps_policy() {
    let config = ElevatorConfig::new().with_load_policy(LoadPolicy::StopAtOverweight);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"stop_at_overweight\""));
    assert_eq!(ElevatorConfig::from_json_str(&json).unwrap(), config);
}
