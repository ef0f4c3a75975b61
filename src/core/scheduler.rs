//! LOOK scheduler: the control loop deciding, once per cycle, whether the car
//! transfers, moves one floor, reverses, idles or goes offline.
//!
//! Every decision is taken by [`plan_cycle`] while the building lock is held.
//! The loop in [`run_scheduler`] then carries it out: a transfer is handed to
//! the worker and waited on, a move is followed by the transit delay with the
//! lock released.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::{debug, error, info};

use crate::core::audit::{AuditAction, Recorder};
use crate::core::building::{Building, Shared};
use crate::core::car::{Car, CarState, Direction};
use crate::core::floors::FloorQueues;
use crate::core::transfer::{needs_transfer, TransferOrder};
use crate::core::ElevatorError;

/// Outcome of one scheduling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cycle {
    /// Stop requested and drained; the loop ends.
    Offline,
    /// Nothing to do.
    Idle,
    /// A transfer is due at the current floor.
    Transfer,
    /// The car advanced one floor in this direction.
    Move(Direction),
    /// No demand either way; re-evaluate after a poll interval.
    Hold,
}

/// Any manifest destination or waiting floor strictly ahead in `direction`.
fn demand_ahead(car: &Car, floors: &FloorQueues, direction: Direction) -> bool {
    let floor = car.current_floor();
    match direction {
        Direction::Up => car.has_destination_above(floor) || floors.has_waiting_above(floor),
        Direction::Down => car.has_destination_below(floor) || floors.has_waiting_below(floor),
    }
}

/// Apply the LOOK direction rule, then advance one floor if there is demand.
fn look_step(building: &mut Building, audit: &Recorder) -> Option<Direction> {
    let top = building.floors.floor_count();
    let floor = building.car.current_floor();
    let sweep = building.car.direction();

    let at_end = match sweep {
        Direction::Up => floor == top,
        Direction::Down => floor == 1,
    };
    if at_end || !demand_ahead(&building.car, &building.floors, sweep) {
        let reversed = sweep.reversed();
        building.car.set_direction(reversed);
        audit.record(floor, AuditAction::Reversed { direction: reversed });
        debug!(floor, direction = ?reversed, "Sweep reversed");
    }

    let sweep = building.car.direction();
    if !demand_ahead(&building.car, &building.floors, sweep) {
        return None;
    }
    building.car.set_state(sweep.moving_state());
    building.car.advance(sweep, top);
    let to = building.car.current_floor();
    audit.record(floor, AuditAction::Departed { from: floor, to });
    debug!(from = floor, to, "Car moving");
    Some(sweep)
}

/// Decide and apply this cycle's transition. Transfer takes priority over
/// movement, and OFFLINE is only reached once a stop is pending and the
/// building is drained.
pub(crate) fn plan_cycle(building: &mut Building, audit: &Recorder) -> Cycle {
    if building.is_drained() {
        if building.stop_requested {
            building.stop_requested = false;
            building.car.set_state(CarState::Offline);
            audit.record(building.car.current_floor(), AuditAction::Offline);
            return Cycle::Offline;
        }
        building.car.set_state(CarState::Idle);
        return Cycle::Idle;
    }

    if needs_transfer(&building.car, &building.floors, building.policy) {
        building.car.set_state(CarState::Loading);
        return Cycle::Transfer;
    }

    look_step(building, audit).map_or(Cycle::Hold, Cycle::Move)
}

/// Delays used by the scheduler loop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SchedulerTiming {
    pub(crate) transit: Duration,
    pub(crate) poll: Duration,
}

/// Puts the car offline if the scheduler unwinds, so waiters are released.
struct PanicGuard<'a> {
    shared: &'a Shared,
}

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut building = self.shared.building.lock();
            building.car.set_state(CarState::Offline);
            building.transfer_in_flight = false;
            drop(building);
            error!("Scheduler panicked");
            self.shared.changed.notify_all();
        }
    }
}

/// Scheduler loop. Returns `Ok` once the car is offline or on teardown, and
/// `Interrupted` if the transfer worker vanished during a handoff.
pub(crate) fn run_scheduler(
    shared: Arc<Shared>,
    orders: Sender<TransferOrder>,
    timing: SchedulerTiming,
) -> Result<(), ElevatorError> {
    let _guard = PanicGuard { shared: &shared };
    debug!("Scheduler started");

    loop {
        let mut building = shared.building.lock();
        if building.terminate {
            debug!("Scheduler terminating");
            return Ok(());
        }
        if building.is_quiescent() {
            // Woken by a request, a stop, or the poll timeout.
            shared.changed.wait_for(&mut building, timing.poll);
            if building.terminate {
                return Ok(());
            }
        }

        match plan_cycle(&mut building, &shared.audit) {
            Cycle::Offline => {
                drop(building);
                shared.changed.notify_all();
                info!("Elevator drained and offline");
                return Ok(());
            }
            Cycle::Idle => {}
            Cycle::Transfer => {
                let floor = building.car.current_floor();
                building.transfer_in_flight = true;
                let sent = !building.worker_exited && orders.try_send(TransferOrder { floor }).is_ok();
                if sent {
                    shared.changed.wait_while(&mut building, |b| {
                        b.transfer_in_flight && !b.worker_exited && !b.terminate
                    });
                }
                if building.terminate {
                    return Ok(());
                }
                if !sent || building.worker_exited {
                    building.transfer_in_flight = false;
                    building.car.set_state(CarState::Offline);
                    shared.audit.record(floor, AuditAction::Offline);
                    drop(building);
                    shared.changed.notify_all();
                    error!(floor, "Transfer worker gone during handoff");
                    return Err(ElevatorError::Interrupted(format!(
                        "transfer worker exited during a transfer at floor {floor}"
                    )));
                }
                building.car.set_state(CarState::Idle);
            }
            Cycle::Move(_) => shared.hold(&mut building, timing.transit),
            Cycle::Hold => shared.hold(&mut building, timing.poll),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ElevatorConfig, LoadPolicy};
    use crate::core::pet::PetKind;
    use crate::core::transfer::transfer;

    fn running_building() -> Building {
        let mut building = Building::new(&ElevatorConfig::new());
        building.car.reset_for_start();
        building
    }

    /// Run cycles synchronously, performing transfers inline, until idle or
    /// offline. Returns the floors transfers happened at.
    fn drive(building: &mut Building) -> Vec<usize> {
        let audit = Recorder::default();
        let mut stops = Vec::new();
        for _ in 0..100 {
            match plan_cycle(building, &audit) {
                Cycle::Idle | Cycle::Offline => return stops,
                Cycle::Transfer => {
                    stops.push(building.car.current_floor());
                    let policy = building.policy;
                    transfer(&mut building.car, &mut building.floors, policy);
                }
                Cycle::Move(_) | Cycle::Hold => {}
            }
        }
        panic!("scheduler did not settle, stops so far: {stops:?}");
    }

    #[test]
    fn test_look_finishes_sweep_before_reversing() {
        let mut building = running_building();
        building.car.advance(Direction::Up, 5);
        for destination in [1, 3, 5] {
            building.floors.submit(2, destination, PetKind::Chihuahua.code()).unwrap();
        }
        let policy = building.policy;
        transfer(&mut building.car, &mut building.floors, policy);
        assert_eq!(building.car.manifest().len(), 3);

        assert_eq!(drive(&mut building), vec![3, 5, 1]);
        assert_eq!(building.car.total_serviced(), 3);
    }

    #[test]
    fn test_two_pets_from_ground_floor() {
        let mut building = running_building();
        building.floors.submit(1, 5, PetKind::Chihuahua.code()).unwrap();
        building.floors.submit(1, 2, PetKind::Dachshund.code()).unwrap();

        assert_eq!(drive(&mut building), vec![1, 2, 5]);
        assert_eq!(building.car.total_serviced(), 2);
        assert!(building.is_drained());
        assert_eq!(building.car.state(), CarState::Idle);
    }

    #[test]
    fn test_transfer_beats_movement() {
        let mut building = running_building();
        building.floors.submit(1, 3, PetKind::Pug.code()).unwrap();
        building.floors.submit(4, 2, PetKind::Pug.code()).unwrap();
        let audit = Recorder::default();
        assert_eq!(plan_cycle(&mut building, &audit), Cycle::Transfer);
        assert_eq!(building.car.state(), CarState::Loading);
    }

    #[test]
    fn test_reverses_at_top_floor() {
        let mut building = running_building();
        for _ in 0..4 {
            building.car.advance(Direction::Up, 5);
        }
        building.floors.submit(2, 1, PetKind::Pug.code()).unwrap();
        let audit = Recorder::default();
        assert_eq!(plan_cycle(&mut building, &audit), Cycle::Move(Direction::Down));
        assert_eq!(building.car.current_floor(), 4);
        assert_eq!(building.car.state(), CarState::MovingDown);
    }

    #[test]
    fn test_offline_only_once_drained() {
        let mut building = running_building();
        building.floors.submit(3, 1, PetKind::Pug.code()).unwrap();
        building.stop_requested = true;
        let audit = Recorder::default();
        assert_eq!(plan_cycle(&mut building, &audit), Cycle::Move(Direction::Up));

        drive(&mut building);
        assert_eq!(building.car.state(), CarState::Offline);
        assert!(building.is_drained());
    }

    #[test]
    fn test_stop_at_overweight_policy_still_settles() {
        let mut building = Building::new(
            &ElevatorConfig::new().with_load_policy(LoadPolicy::StopAtOverweight),
        );
        building.car.reset_for_start();
        for kind in [PetKind::Dachshund, PetKind::Dachshund, PetKind::Dachshund, PetKind::Chihuahua] {
            building.floors.submit(1, 3, kind.code()).unwrap();
        }
        building.floors.submit(1, 2, PetKind::Dachshund.code()).unwrap();

        let stops = drive(&mut building);
        assert_eq!(stops.first(), Some(&1));
        assert!(building.is_drained());
        assert_eq!(building.car.total_serviced(), 5);
    }
}
