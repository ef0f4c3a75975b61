//! Point-in-time status snapshot of the car and every floor.

use std::fmt;

use serde::Serialize;

use crate::core::building::Building;
use crate::core::car::{CarState, Direction};
use crate::core::pet::{Pet, PetView};

/// Pets waiting on one floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorStatus {
    /// Floor number.
    pub floor: usize,
    /// Waiting pets, front of the queue first.
    pub waiting: Vec<PetView>,
}

/// Consistent snapshot, captured under a single lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElevatorStatus {
    /// Operating state.
    pub state: CarState,
    /// Current floor.
    pub current_floor: usize,
    /// Sweep direction.
    pub direction: Direction,
    /// Total weight aboard, in lbs.
    pub current_load: u32,
    /// Pets aboard in boarding order.
    pub passengers: Vec<PetView>,
    /// Floors in ascending order.
    pub floors: Vec<FloorStatus>,
    /// Pets waiting across all floors.
    pub total_waiting: usize,
    /// Pets delivered so far.
    pub total_serviced: u64,
    /// Whether a stop is pending.
    pub stop_requested: bool,
}

impl ElevatorStatus {
    pub(crate) fn capture(building: &Building) -> Self {
        let car = &building.car;
        let floors = (1..=building.floors.floor_count())
            .map(|floor| FloorStatus {
                floor,
                waiting: building.floors.iter_floor(floor).map(Pet::view).collect(),
            })
            .collect();
        Self {
            state: car.state(),
            current_floor: car.current_floor(),
            direction: car.direction(),
            current_load: car.current_load(),
            passengers: car.manifest().iter().map(Pet::view).collect(),
            floors,
            total_waiting: building.floors.total_waiting(),
            total_serviced: car.total_serviced(),
            stop_requested: building.stop_requested,
        }
    }

    /// Serialize the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ElevatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elevator state: {}", self.state)?;
        writeln!(f, "Current floor: {}", self.current_floor)?;
        writeln!(f, "Current load: {} lbs", self.current_load)?;
        write!(f, "Elevator status:")?;
        for pet in &self.passengers {
            write!(f, " {pet}")?;
        }
        writeln!(f, "\n")?;

        for floor in self.floors.iter().rev() {
            let marker = if floor.floor == self.current_floor { '*' } else { ' ' };
            write!(f, "[{marker}] Floor {}: {} ", floor.floor, floor.waiting.len())?;
            for pet in &floor.waiting {
                write!(f, "{pet} ")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nNumber of pets waiting: {}", self.total_waiting)?;
        writeln!(f, "Number of pets serviced: {}", self.total_serviced)
    }
}
