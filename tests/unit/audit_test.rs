//! Tests for audit sink

use std::sync::Arc;
use std::time::Duration;

use pet_elevator::core::build_audit_event;
use pet_elevator::{AuditAction, AuditSink, Direction, Elevator, ElevatorConfig, InMemoryAuditSink, PetKind};

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);
    sink.record(build_audit_event(0, 1, AuditAction::Started));
    sink.record(build_audit_event(1, 1, AuditAction::Reversed { direction: Direction::Down }));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::Started);
    assert_eq!(events[1].seq, 1);
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);
    sink.record(build_audit_event(0, 1, AuditAction::Started));
    sink.record(build_audit_event(1, 1, AuditAction::Departed { from: 1, to: 2 }));
    sink.record(build_audit_event(2, 2, AuditAction::Departed { from: 2, to: 3 }));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].seq, 1); // First one popped
    assert_eq!(events[1].seq, 2);
}

#[test]
fn test_audit_event_serializes_flat() {
    let event = build_audit_event(7, 3, AuditAction::Departed { from: 3, to: 4 });
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["seq"], 7);
    assert_eq!(value["action"], "departed");
    assert_eq!(value["to"], 4);
    assert!(value["created_at_ms"].as_u64().is_some());
}

#[test]
fn test_elevator_records_request_then_stop() {
    let sink = InMemoryAuditSink::new(100);
    let config = ElevatorConfig::new().with_time_unit(Duration::from_millis(50));
    let elevator = Elevator::with_audit(config, Arc::new(sink.clone())).unwrap();

    elevator.start().unwrap();
    let id = elevator.issue_request(4, 2, PetKind::Pughuahua.code()).unwrap();
    elevator.stop();

    let actions = sink.actions();
    assert_eq!(actions[0], AuditAction::Started);
    assert!(matches!(actions[1], AuditAction::Requested { pet } if pet.id == id && pet.origin == 4));
    assert!(actions.contains(&AuditAction::StopRequested));
    elevator.shutdown().unwrap();
}
