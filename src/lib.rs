//! # Pet Elevator
//!
//! A single-car freight elevator that carries weighted pets between floors,
//! scheduled with the LOOK algorithm.
//!
//! Two long-lived actors share one monitor (a `parking_lot` mutex and
//! condition variable) over the car and the floor queues:
//!
//! - **Scheduler**: once per cycle decides whether to transfer at the current
//!   floor, move one floor, reverse the sweep, idle or go offline. Transfers
//!   always win over movement.
//! - **Transfer worker**: on an order from the scheduler, unloads every pet
//!   headed to the current floor, then boards waiting pets in FIFO order within
//!   the count and weight limits.
//!
//! Neither actor holds the lock across a simulated delay, so requests and
//! status reads never wait for the car to move.
//!
//! ## Pet kinds
//!
//! | code | kind | weight | symbol |
//! |---|---|---|---|
//! | 0 | Chihuahua | 3 lbs | `C` |
//! | 1 | Pug | 14 lbs | `P` |
//! | 2 | Pughuahua | 10 lbs | `H` |
//! | 3 | Dachshund | 16 lbs | `D` |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pet_elevator::{Elevator, ElevatorConfig, PetKind, StopOutcome};
//! use std::time::Duration;
//!
//! let elevator = Elevator::new(ElevatorConfig::from_env()?)?;
//! elevator.start()?;
//! elevator.issue_request(1, 5, PetKind::Chihuahua.code())?;
//! elevator.issue_request(1, 2, PetKind::Dachshund.code())?;
//!
//! assert_eq!(elevator.stop(), StopOutcome::Stopping);
//! elevator.wait_until_offline(Duration::from_secs(60))?;
//! print!("{}", elevator.status());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Elevator core: data model, scheduler, transfer engine and coordinator.
pub mod core;
/// Configuration models for the building, car limits and timing.
pub mod config;
/// Async facade over the blocking API.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::config::{ElevatorConfig, LoadPolicy};
pub use crate::core::{
    AuditAction, AuditEvent, AuditSink, CarState, Direction, Elevator, ElevatorError, ElevatorStatus,
    FloorStatus, InMemoryAuditSink, PetId, PetKind, PetView, StartOutcome, StopOutcome, TransferReport,
};
