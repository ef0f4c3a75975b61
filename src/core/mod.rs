//! Elevator core: data model, LOOK scheduler, transfer engine and coordinator.

pub mod audit;
pub(crate) mod building;
pub mod car;
pub mod coordinator;
pub mod error;
pub mod floors;
pub mod pet;
pub(crate) mod scheduler;
pub mod status;
pub mod transfer;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use car::{Car, CarState, Direction};
pub use coordinator::{Elevator, StartOutcome, StopOutcome};
pub use error::{AppResult, ElevatorError};
pub use floors::FloorQueues;
pub use pet::{Pet, PetId, PetKind, PetView};
pub use status::{ElevatorStatus, FloorStatus};
pub use transfer::{needs_transfer, transfer, TransferReport};
