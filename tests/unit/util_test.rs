//! Tests for util helpers

use pet_elevator::util::{init_tracing, now_ms};

#[test]
fn test_now_ms_advances() {
    let first = now_ms();
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(now_ms() > first);
}

#[test]
fn test_init_tracing_is_repeatable() {
    init_tracing();
    init_tracing();
    tracing::info!(target: "pet_elevator", "telemetry initialized");
}
