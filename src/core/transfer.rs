//! Transfer engine: one unload pass then one load pass at the current floor.
//!
//! The scheduler decides *when* a transfer happens; the worker thread in this
//! module performs it. The worker owns no state of its own: it takes the
//! building lock, mutates the manifest and the floor queue, releases the lock
//! for the loading delay and then hands control back by clearing
//! `transfer_in_flight`.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::LoadPolicy;
use crate::core::audit::AuditAction;
use crate::core::building::Shared;
use crate::core::car::Car;
use crate::core::floors::FloorQueues;
use crate::core::pet::{Pet, PetView};

/// Order sent from the scheduler to the transfer worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TransferOrder {
    pub(crate) floor: usize,
}

/// What one transfer changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    /// Floor the transfer happened at.
    pub floor: usize,
    /// Pets that left the car, in manifest order.
    pub delivered: Vec<PetView>,
    /// Pets that boarded, in FIFO order.
    pub boarded: Vec<PetView>,
    /// Pets still queued on this floor afterwards.
    pub left_waiting: usize,
}

/// Whether stopping at the car's floor would deliver or board anyone.
///
/// Uses the same boarding rule as [`transfer`], so a transfer is only ordered
/// when it changes something.
#[must_use]
pub fn needs_transfer(car: &Car, floors: &FloorQueues, policy: LoadPolicy) -> bool {
    let floor = car.current_floor();
    if car.has_destination(floor) {
        return true;
    }
    match policy {
        LoadPolicy::SkipOverweight => floors.iter_floor(floor).any(|pet| car.can_board(pet)),
        LoadPolicy::StopAtOverweight => floors.peek_front(floor).is_some_and(|pet| car.can_board(pet)),
    }
}

/// Unload every pet headed here, then board waiting pets in FIFO order.
///
/// Under [`LoadPolicy::SkipOverweight`] a pet that does not fit stays queued
/// and the scan continues behind it; under [`LoadPolicy::StopAtOverweight`]
/// the scan ends at the first pet that does not fit. A full car ends the scan
/// under both.
pub fn transfer(car: &mut Car, floors: &mut FloorQueues, policy: LoadPolicy) -> TransferReport {
    let floor = car.current_floor();
    let delivered = car.unload_current_floor().iter().map(Pet::view).collect();

    let mut boarded = Vec::new();
    loop {
        let next = match policy {
            LoadPolicy::SkipOverweight => floors.pop_matching(floor, |pet| car.can_board(pet)),
            LoadPolicy::StopAtOverweight => {
                if floors.peek_front(floor).is_some_and(|pet| car.can_board(pet)) {
                    floors.pop_matching(floor, |_| true)
                } else {
                    None
                }
            }
        };
        let Some(pet) = next else { break };
        boarded.push(pet.view());
        car.board(pet);
    }

    TransferReport {
        floor,
        delivered,
        boarded,
        left_waiting: floors.waiting_at(floor),
    }
}

/// Marks the worker gone however it leaves its loop, so a scheduler waiting
/// on a handoff is never stranded.
struct ExitGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let mut building = self.shared.building.lock();
        building.worker_exited = true;
        building.transfer_in_flight = false;
        if std::thread::panicking() {
            error!("Transfer worker panicked");
        }
        drop(building);
        self.shared.changed.notify_all();
    }
}

/// Transfer worker loop. Ends when the scheduler drops its sender or on
/// teardown.
pub(crate) fn run_transfer_worker(shared: Arc<Shared>, orders: Receiver<TransferOrder>, delay: Duration) {
    let _guard = ExitGuard { shared: &shared };
    debug!("Transfer worker started");

    for order in &orders {
        let mut building = shared.building.lock();
        if building.terminate {
            break;
        }

        let b = &mut *building;
        let report = transfer(&mut b.car, &mut b.floors, b.policy);
        for pet in &report.delivered {
            shared.audit.record(order.floor, AuditAction::Delivered { pet: *pet });
        }
        for pet in &report.boarded {
            shared.audit.record(order.floor, AuditAction::Boarded { pet: *pet });
        }
        debug!(
            floor = report.floor,
            delivered = report.delivered.len(),
            boarded = report.boarded.len(),
            left_waiting = report.left_waiting,
            load = building.car.current_load(),
            "Transfer complete"
        );

        shared.hold(&mut building, delay);
        building.transfer_in_flight = false;
        drop(building);
        shared.changed.notify_all();
    }

    debug!("Transfer worker exiting");
}
