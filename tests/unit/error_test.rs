//! Tests for error types

use pet_elevator::core::AppResult;
use pet_elevator::ElevatorError;

#[test]
fn test_invalid_request_error() {
    let err = ElevatorError::InvalidRequest("origin floor 6 outside 1..=5".to_string());
    assert_eq!(format!("{err}"), "invalid request: origin floor 6 outside 1..=5");
}

#[test]
fn test_offline_error() {
    assert_eq!(format!("{}", ElevatorError::Offline), "elevator is offline");
}

#[test]
fn test_timeout_error() {
    let err = ElevatorError::Timeout("elevator to go offline after 20ms".to_string());
    assert_eq!(format!("{err}"), "timed out waiting for elevator to go offline after 20ms");
}

#[test]
fn test_resource_exhausted_is_retryable() {
    let err = ElevatorError::ResourceExhausted("1024 pets already waiting".to_string());
    assert!(err.is_retryable());
    assert!(!ElevatorError::InvalidConfig("floors".to_string()).is_retryable());
}

#[test]
fn test_converts_into_app_result() {
    fn submit() -> AppResult<()> {
        let offline: Result<(), ElevatorError> = Err(ElevatorError::Offline);
        offline?;
        Ok(())
    }
    let err = submit().unwrap_err();
    assert_eq!(err.to_string(), "elevator is offline");
    assert!(err.downcast_ref::<ElevatorError>().is_some());
}
