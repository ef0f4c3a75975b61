//! The elevator coordinator: lifecycle operations over the two actors.
//!
//! # Locking
//!
//! All car and floor state lives behind one `parking_lot::Mutex` paired with a
//! `Condvar`. The lifecycle lock (`actors`) is only ever taken *before* the
//! building lock, never while holding it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ElevatorConfig;
use crate::core::audit::{AuditAction, AuditSink, Recorder};
use crate::core::building::Shared;
use crate::core::car::CarState;
use crate::core::pet::PetId;
use crate::core::scheduler::{run_scheduler, SchedulerTiming};
use crate::core::status::ElevatorStatus;
use crate::core::transfer::{run_transfer_worker, TransferOrder};
use crate::core::ElevatorError;

/// Result of [`Elevator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    /// Actors launched; the car is idle at floor 1.
    Started,
    /// The car was not offline; nothing changed.
    AlreadyRunning,
}

/// Result of [`Elevator::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// Stop recorded; the car goes offline once drained.
    Stopping,
    /// Already offline, or a stop is already draining.
    AlreadyStopped,
}

struct Actors {
    scheduler: JoinHandle<Result<(), ElevatorError>>,
    worker: JoinHandle<()>,
}

impl Actors {
    fn join(self) -> Result<(), ElevatorError> {
        let scheduler = self.scheduler.join();
        let worker = self.worker.join();
        match (scheduler, worker) {
            (Ok(result), Ok(())) => result,
            (Err(_), _) => Err(ElevatorError::Interrupted("scheduler thread panicked".into())),
            (Ok(_), Err(_)) => Err(ElevatorError::Interrupted("transfer worker panicked".into())),
        }
    }
}

/// A single-car pet elevator driven by a LOOK scheduler and a transfer worker.
///
/// ```rust,ignore
/// use pet_elevator::{Elevator, ElevatorConfig, PetKind};
/// use std::time::Duration;
///
/// let elevator = Elevator::new(ElevatorConfig::new())?;
/// elevator.start()?;
/// elevator.issue_request(1, 5, PetKind::Chihuahua.code())?;
/// elevator.stop();
/// elevator.wait_until_offline(Duration::from_secs(60))?;
/// println!("{}", elevator.status());
/// ```
pub struct Elevator {
    config: ElevatorConfig,
    shared: Arc<Shared>,
    actors: Mutex<Option<Actors>>,
}

impl Elevator {
    /// Create an offline elevator.
    ///
    /// # Errors
    ///
    /// Returns `ElevatorError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: ElevatorConfig) -> Result<Self, ElevatorError> {
        Self::build(config, Recorder::default())
    }

    /// Create an offline elevator that mirrors every state change to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `ElevatorError::InvalidConfig` if the configuration is invalid.
    pub fn with_audit(config: ElevatorConfig, sink: Arc<dyn AuditSink>) -> Result<Self, ElevatorError> {
        Self::build(config, Recorder::new(Some(sink)))
    }

    fn build(config: ElevatorConfig, audit: Recorder) -> Result<Self, ElevatorError> {
        config.validate().map_err(ElevatorError::InvalidConfig)?;
        let shared = Arc::new(Shared::new(&config, audit));
        info!(
            floors = config.floors,
            max_pets = config.max_pets,
            max_weight = config.max_weight,
            load_policy = ?config.load_policy,
            "Elevator initialized"
        );
        Ok(Self {
            config,
            shared,
            actors: Mutex::new(None),
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ElevatorConfig {
        &self.config
    }

    /// Launch the scheduler and the transfer worker.
    ///
    /// Resets the car to floor 1, facing up, idle. Pets delivered before a
    /// previous stop stay counted.
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` if a thread cannot be spawned. The car stays
    /// offline and no actor is left running.
    pub fn start(&self) -> Result<StartOutcome, ElevatorError> {
        let mut actors = self.actors.lock();
        if self.shared.building.lock().car.state() != CarState::Offline {
            return Ok(StartOutcome::AlreadyRunning);
        }
        if let Some(previous) = actors.take() {
            if let Err(err) = previous.join() {
                warn!(error = %err, "Previous run ended with a fault");
            }
        }

        // Spawned under the building lock: neither actor runs before the car
        // leaves OFFLINE, and a failed spawn leaves nothing to undo.
        let mut building = self.shared.building.lock();
        building.stop_requested = false;
        building.terminate = false;
        building.transfer_in_flight = false;
        building.worker_exited = false;

        let (orders_tx, orders_rx) = bounded::<TransferOrder>(1);
        let worker_shared = Arc::clone(&self.shared);
        let transfer_delay = self.config.transfer_delay();
        let worker = thread::Builder::new()
            .name("elevator-transfer".into())
            .spawn(move || run_transfer_worker(worker_shared, orders_rx, transfer_delay))
            .map_err(|e| {
                warn!(error = %e, "Failed to spawn transfer worker");
                ElevatorError::ResourceExhausted(format!("transfer worker: {e}"))
            })?;

        let scheduler_shared = Arc::clone(&self.shared);
        let timing = SchedulerTiming {
            transit: self.config.transit_delay(),
            poll: self.config.poll_interval(),
        };
        let scheduler = match thread::Builder::new()
            .name("elevator-scheduler".into())
            .spawn(move || run_scheduler(scheduler_shared, orders_tx, timing))
        {
            Ok(handle) => handle,
            Err(e) => {
                // The failed spawn dropped the order sender, which ends the worker.
                drop(building);
                if worker.join().is_err() {
                    warn!("Transfer worker panicked during rollback");
                }
                warn!(error = %e, "Failed to spawn scheduler, start rolled back");
                return Err(ElevatorError::ResourceExhausted(format!("scheduler: {e}")));
            }
        };

        building.car.reset_for_start();
        self.shared.audit.record(1, AuditAction::Started);
        drop(building);
        *actors = Some(Actors { scheduler, worker });
        info!("Elevator started");
        Ok(StartOutcome::Started)
    }

    /// Queue a pet at `origin` bound for `destination`.
    ///
    /// `kind` is a [`PetKind`](crate::core::PetKind) wire code.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an out-of-range floor, equal floors or unknown
    /// kind; `Offline` if the elevator is not running; `ResourceExhausted` if
    /// the waiting-pet bound is reached. Nothing is queued on error.
    pub fn issue_request(&self, origin: i32, destination: i32, kind: i32) -> Result<PetId, ElevatorError> {
        let mut building = self.shared.building.lock();
        if let Err(err) = building.floors.validate(origin, destination, kind) {
            warn!(origin, destination, kind, error = %err, "Rejected request");
            return Err(err);
        }
        if building.car.state() == CarState::Offline {
            return Err(ElevatorError::Offline);
        }

        let floor = building.car.current_floor();
        let pet = match building.floors.submit(origin, destination, kind) {
            Ok(pet) => pet.view(),
            Err(err) => {
                warn!(origin, destination, error = %err, "Request not queued");
                return Err(err);
            }
        };
        self.shared.audit.record(floor, AuditAction::Requested { pet });
        drop(building);
        self.shared.changed.notify_all();

        debug!(pet_id = %pet.id, kind = %pet.kind, origin, destination, "Request queued");
        Ok(pet.id)
    }

    /// Ask the car to go offline once every pet has been delivered. Does not
    /// wait for the drain.
    pub fn stop(&self) -> StopOutcome {
        let mut building = self.shared.building.lock();
        if building.car.state() == CarState::Offline || building.stop_requested {
            return StopOutcome::AlreadyStopped;
        }
        building.stop_requested = true;
        let floor = building.car.current_floor();
        self.shared.audit.record(floor, AuditAction::StopRequested);
        drop(building);
        self.shared.changed.notify_all();

        info!(floor, "Stop requested, draining");
        StopOutcome::Stopping
    }

    /// Consistent snapshot of the car and all floors.
    #[must_use]
    pub fn status(&self) -> ElevatorStatus {
        ElevatorStatus::capture(&self.shared.building.lock())
    }

    /// Whether the car is anything but offline.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.building.lock().car.state() != CarState::Offline
    }

    /// Block until the car is offline, then reap the actors.
    ///
    /// # Errors
    ///
    /// `Timeout` if the car is still running after `timeout`; `Interrupted` if
    /// an actor faulted.
    pub fn wait_until_offline(&self, timeout: Duration) -> Result<(), ElevatorError> {
        wait_offline(&self.shared, timeout)?;
        self.reap()
    }

    #[cfg(feature = "tokio-runtime")]
    pub(crate) fn shared(&self) -> Arc<Shared> {
        Arc::clone(&self.shared)
    }

    /// Join finished actors, if the car is still offline.
    pub(crate) fn reap(&self) -> Result<(), ElevatorError> {
        let mut actors = self.actors.lock();
        if self.shared.building.lock().car.state() != CarState::Offline {
            return Ok(());
        }
        actors.take().map_or(Ok(()), Actors::join)
    }

    /// Hard teardown: both actors exit without draining and are joined.
    /// Pets still queued or aboard are discarded.
    ///
    /// # Errors
    ///
    /// `Interrupted` if an actor had faulted.
    pub fn shutdown(&self) -> Result<(), ElevatorError> {
        let mut actors = self.actors.lock();
        let mut building = self.shared.building.lock();
        building.terminate = true;
        building.stop_requested = false;
        building.transfer_in_flight = false;
        let dropped = building.floors.clear() + building.car.discard_manifest();
        if building.car.state() != CarState::Offline {
            building.car.set_state(CarState::Offline);
            let floor = building.car.current_floor();
            self.shared.audit.record(floor, AuditAction::Offline);
        }
        drop(building);
        self.shared.changed.notify_all();
        if dropped > 0 {
            warn!(dropped, "Discarded pets on shutdown");
        }

        let result = actors.take().map_or(Ok(()), Actors::join);
        info!("Elevator shut down");
        result
    }
}

impl Drop for Elevator {
    fn drop(&mut self) {
        // Signal teardown but don't join; `shutdown()` is the joining path.
        let mut building = self.shared.building.lock();
        if !building.terminate {
            building.terminate = true;
            drop(building);
            self.shared.changed.notify_all();
            debug!("Elevator dropped without explicit shutdown - actors will be detached");
        }
    }
}

/// Wait on the shared condvar until the car reports OFFLINE.
pub(crate) fn wait_offline(shared: &Shared, timeout: Duration) -> Result<(), ElevatorError> {
    let deadline = Instant::now() + timeout;
    let mut building = shared.building.lock();
    while building.car.state() != CarState::Offline {
        if shared.changed.wait_until(&mut building, deadline).timed_out()
            && building.car.state() != CarState::Offline
        {
            return Err(ElevatorError::Timeout(format!(
                "elevator to go offline after {}ms",
                timeout.as_millis()
            )));
        }
    }
    Ok(())
}
