//! Integration tests for the elevator lifecycle with real actor threads.
//!
//! These tests run the scheduler and transfer worker with a millisecond time
//! unit and cover:
//! - start / stop idempotence and restart
//! - request validation and offline rejection
//! - draining to OFFLINE with every pet delivered at its destination
//! - hard shutdown

use std::sync::Arc;
use std::time::Duration;

use pet_elevator::{
    AuditAction, CarState, Elevator, ElevatorConfig, ElevatorError, InMemoryAuditSink, PetId, PetKind,
    StartOutcome, StopOutcome,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

const DRAIN_TIMEOUT: Duration = Duration::from_secs(20);

fn fast_config() -> ElevatorConfig {
    ElevatorConfig::new().with_time_unit(Duration::from_millis(1))
}

fn delivered(sink: &InMemoryAuditSink) -> Vec<(PetId, usize)> {
    sink.events()
        .into_iter()
        .filter_map(|event| match event.action {
            AuditAction::Delivered { pet } => Some((pet.id, event.floor)),
            _ => None,
        })
        .collect()
}

fn position(actions: &[AuditAction], wanted: impl Fn(&AuditAction) -> bool) -> Option<usize> {
    actions.iter().position(wanted)
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_stop_twice_then_drain_to_offline() {
    let sink = InMemoryAuditSink::new(1000);
    let elevator = Elevator::with_audit(fast_config(), Arc::new(sink.clone())).unwrap();

    assert_eq!(elevator.start().unwrap(), StartOutcome::Started);
    let chihuahua = elevator.issue_request(1, 5, PetKind::Chihuahua.code()).unwrap();
    let dachshund = elevator.issue_request(1, 2, PetKind::Dachshund.code()).unwrap();

    assert_eq!(elevator.stop(), StopOutcome::Stopping);
    assert_eq!(elevator.stop(), StopOutcome::AlreadyStopped);
    elevator.wait_until_offline(DRAIN_TIMEOUT).unwrap();

    let status = elevator.status();
    assert_eq!(status.state, CarState::Offline);
    assert_eq!(status.total_serviced, 2);
    assert_eq!(status.total_waiting, 0);
    assert!(status.passengers.is_empty());
    assert_eq!(status.current_load, 0);
    assert!(!status.stop_requested);

    let mut delivered = delivered(&sink);
    delivered.sort_by_key(|(_, floor)| *floor);
    assert_eq!(delivered, vec![(dachshund, 2), (chihuahua, 5)]);

    let actions = sink.actions();
    assert_eq!(actions.first(), Some(&AuditAction::Started));
    assert_eq!(actions.last(), Some(&AuditAction::Offline));
}

#[test]
fn test_every_pet_boards_before_delivery() {
    let sink = InMemoryAuditSink::new(1000);
    let elevator = Elevator::with_audit(fast_config(), Arc::new(sink.clone())).unwrap();
    elevator.start().unwrap();

    let requests = [(3, 1, PetKind::Pug), (5, 2, PetKind::Pughuahua), (2, 4, PetKind::Dachshund)];
    let ids: Vec<PetId> = requests
        .iter()
        .map(|(origin, destination, kind)| elevator.issue_request(*origin, *destination, kind.code()).unwrap())
        .collect();
    elevator.stop();
    elevator.wait_until_offline(DRAIN_TIMEOUT).unwrap();

    let actions = sink.actions();
    for (id, (_, destination, _)) in ids.iter().zip(requests) {
        let boarded = position(&actions, |a| matches!(a, AuditAction::Boarded { pet } if pet.id == *id));
        let arrived = position(&actions, |a| matches!(a, AuditAction::Delivered { pet } if pet.id == *id));
        assert!(boarded.is_some(), "pet {id} never boarded");
        assert!(boarded < arrived, "pet {id} delivered before boarding");
        let destination = usize::try_from(destination).unwrap();
        assert!(delivered(&sink).contains(&(*id, destination)));
    }
}

#[test]
fn test_restart_keeps_counting() {
    let elevator = Elevator::new(fast_config()).unwrap();

    elevator.start().unwrap();
    elevator.issue_request(2, 4, PetKind::Pug.code()).unwrap();
    elevator.stop();
    elevator.wait_until_offline(DRAIN_TIMEOUT).unwrap();
    assert_eq!(elevator.status().total_serviced, 1);

    assert_eq!(elevator.start().unwrap(), StartOutcome::Started);
    let status = elevator.status();
    assert_eq!(status.current_floor, 1);
    assert_ne!(status.state, CarState::Offline);

    elevator.issue_request(4, 1, PetKind::Chihuahua.code()).unwrap();
    elevator.stop();
    elevator.wait_until_offline(DRAIN_TIMEOUT).unwrap();
    assert_eq!(elevator.status().total_serviced, 2);
}

#[test]
fn test_requests_accepted_while_draining() {
    let config = ElevatorConfig::new().with_time_unit(Duration::from_millis(20));
    let elevator = Elevator::new(config).unwrap();
    elevator.start().unwrap();

    elevator.issue_request(1, 5, PetKind::Pug.code()).unwrap();
    assert_eq!(elevator.stop(), StopOutcome::Stopping);
    elevator.issue_request(3, 1, PetKind::Pughuahua.code()).unwrap();

    elevator.wait_until_offline(DRAIN_TIMEOUT).unwrap();
    let status = elevator.status();
    assert_eq!(status.total_serviced, 2);
    assert_eq!(status.total_waiting, 0);
}

// ============================================================================
// REJECTIONS
// ============================================================================

#[test]
fn test_invalid_requests_leave_queues_untouched() {
    let elevator = Elevator::new(fast_config()).unwrap();
    elevator.start().unwrap();

    let cases = [(6, 2, 0), (0, 2, 0), (2, 2, 0), (2, 3, 4), (2, 3, -1)];
    for (origin, destination, kind) in cases {
        let result = elevator.issue_request(origin, destination, kind);
        assert!(
            matches!(result, Err(ElevatorError::InvalidRequest(_))),
            "({origin}, {destination}, {kind}) gave {result:?}"
        );
    }
    assert_eq!(elevator.status().total_waiting, 0);
    assert_eq!(elevator.status().total_serviced, 0);

    elevator.shutdown().unwrap();
}

#[test]
fn test_offline_elevator_rejects_requests() {
    let elevator = Elevator::new(fast_config()).unwrap();
    assert!(!elevator.is_running());
    assert_eq!(
        elevator.issue_request(1, 2, PetKind::Pug.code()),
        Err(ElevatorError::Offline)
    );
    assert_eq!(elevator.stop(), StopOutcome::AlreadyStopped);
    assert_eq!(elevator.status().total_waiting, 0);
}

#[test]
fn test_waiting_bound_is_resource_exhausted() {
    let config = ElevatorConfig::new()
        .with_time_unit(Duration::from_millis(50))
        .with_max_waiting(2);
    let elevator = Elevator::new(config).unwrap();
    elevator.start().unwrap();

    // Floor 5 is only reached after a full climb, so these stay queued.
    elevator.issue_request(5, 4, PetKind::Pug.code()).unwrap();
    elevator.issue_request(5, 3, PetKind::Pug.code()).unwrap();
    let result = elevator.issue_request(5, 2, PetKind::Pug.code());
    assert!(matches!(result, Err(ElevatorError::ResourceExhausted(_))));
    assert_eq!(elevator.status().total_waiting, 2);
    elevator.shutdown().unwrap();
}

// ============================================================================
// SHUTDOWN
// ============================================================================

#[test]
fn test_shutdown_discards_and_allows_restart() {
    let config = ElevatorConfig::new().with_time_unit(Duration::from_millis(50));
    let elevator = Elevator::new(config).unwrap();
    elevator.start().unwrap();
    for destination in 2..=5 {
        elevator.issue_request(1, destination, PetKind::Chihuahua.code()).unwrap();
    }
    elevator.issue_request(4, 1, PetKind::Dachshund.code()).unwrap();

    elevator.shutdown().unwrap();
    let status = elevator.status();
    assert_eq!(status.state, CarState::Offline);
    assert_eq!(status.total_waiting, 0);
    assert!(status.passengers.is_empty());
    assert_eq!(elevator.issue_request(1, 2, 0), Err(ElevatorError::Offline));

    assert_eq!(elevator.start().unwrap(), StartOutcome::Started);
    elevator.shutdown().unwrap();
}

#[test]
fn test_drop_without_shutdown_does_not_hang() {
    let elevator = Elevator::new(fast_config()).unwrap();
    elevator.start().unwrap();
    elevator.issue_request(1, 3, PetKind::Pug.code()).unwrap();
    drop(elevator);
}

#[test]
fn test_status_display_while_offline() {
    let elevator = Elevator::new(fast_config()).unwrap();
    let text = elevator.status().to_string();
    assert!(text.starts_with("Elevator state: OFFLINE\nCurrent floor: 1\n"));
    assert!(text.contains("[*] Floor 1: 0"));
    assert!(text.ends_with("Number of pets serviced: 0\n"));
}
