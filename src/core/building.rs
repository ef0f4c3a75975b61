//! Shared state guarded by the single building lock.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::config::{ElevatorConfig, LoadPolicy};
use crate::core::audit::Recorder;
use crate::core::car::Car;
use crate::core::floors::FloorQueues;

/// Car, floor queues and the coordination flags between the two actors.
#[derive(Debug)]
pub(crate) struct Building {
    pub(crate) car: Car,
    pub(crate) floors: FloorQueues,
    pub(crate) policy: LoadPolicy,
    /// Cooperative stop: go offline once drained.
    pub(crate) stop_requested: bool,
    /// Hard teardown: both actors exit at their next check.
    pub(crate) terminate: bool,
    /// Set by the scheduler when it orders a transfer, cleared by the worker.
    pub(crate) transfer_in_flight: bool,
    pub(crate) worker_exited: bool,
}

impl Building {
    pub(crate) fn new(config: &ElevatorConfig) -> Self {
        Self {
            car: Car::new(config.max_pets, config.max_weight),
            floors: FloorQueues::new(config.floors, config.max_waiting),
            policy: config.load_policy,
            stop_requested: false,
            terminate: false,
            transfer_in_flight: false,
            worker_exited: false,
        }
    }

    /// Nothing aboard and nobody waiting.
    pub(crate) fn is_drained(&self) -> bool {
        self.car.is_empty() && !self.floors.has_any_waiting()
    }

    /// Drained with no stop pending: the scheduler may sleep.
    pub(crate) fn is_quiescent(&self) -> bool {
        self.is_drained() && !self.stop_requested
    }
}

/// Monitor shared by the coordinator, the scheduler and the transfer worker.
pub(crate) struct Shared {
    pub(crate) building: Mutex<Building>,
    pub(crate) changed: Condvar,
    pub(crate) audit: Recorder,
}

impl Shared {
    pub(crate) fn new(config: &ElevatorConfig, audit: Recorder) -> Self {
        Self {
            building: Mutex::new(Building::new(config)),
            changed: Condvar::new(),
            audit,
        }
    }

    /// Wait out `delay` with the lock released, returning early on teardown.
    pub(crate) fn hold(&self, building: &mut MutexGuard<'_, Building>, delay: Duration) {
        let deadline = Instant::now() + delay;
        while !building.terminate {
            if self.changed.wait_until(building, deadline).timed_out() {
                break;
            }
        }
    }
}
