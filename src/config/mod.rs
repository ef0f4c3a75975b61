//! Configuration models for the building, the car and simulated timing.

pub mod elevator;

pub use elevator::{ElevatorConfig, LoadPolicy};
