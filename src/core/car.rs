//! The elevator car: position, sweep direction, operating state and manifest.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::pet::Pet;

/// Operating phase of the car, distinct from its sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarState {
    /// Not started, or fully drained after a stop.
    Offline,
    /// Running with nothing to do this cycle.
    Idle,
    /// A transfer is in progress at the current floor.
    Loading,
    /// Travelling one floor up.
    MovingUp,
    /// Travelling one floor down.
    MovingDown,
}

impl fmt::Display for CarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Offline => "OFFLINE",
            Self::Idle => "IDLE",
            Self::Loading => "LOADING",
            Self::MovingUp => "UP",
            Self::MovingDown => "DOWN",
        };
        f.write_str(label)
    }
}

/// LOOK sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards the top floor.
    Up,
    /// Towards floor 1.
    Down,
}

impl Direction {
    /// The other direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Moving state matching this direction.
    #[must_use]
    pub const fn moving_state(self) -> CarState {
        match self {
            Self::Up => CarState::MovingUp,
            Self::Down => CarState::MovingDown,
        }
    }
}

/// Car state. Only ever touched under the shared building lock.
#[derive(Debug)]
pub struct Car {
    state: CarState,
    floor: usize,
    direction: Direction,
    manifest: Vec<Pet>,
    total_serviced: u64,
    max_pets: usize,
    max_weight: u32,
}

impl Car {
    /// A new car, offline at floor 1 and facing up.
    #[must_use]
    pub const fn new(max_pets: usize, max_weight: u32) -> Self {
        Self {
            state: CarState::Offline,
            floor: 1,
            direction: Direction::Up,
            manifest: Vec::new(),
            total_serviced: 0,
            max_pets,
            max_weight,
        }
    }

    /// Current operating state.
    #[must_use]
    pub const fn state(&self) -> CarState {
        self.state
    }

    /// Floor the car is at (or heading to, while moving).
    #[must_use]
    pub const fn current_floor(&self) -> usize {
        self.floor
    }

    /// Current sweep direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Pets aboard, in boarding order.
    #[must_use]
    pub fn manifest(&self) -> &[Pet] {
        &self.manifest
    }

    /// Sum of the weights aboard, recomputed from the manifest.
    #[must_use]
    pub fn current_load(&self) -> u32 {
        self.manifest.iter().map(Pet::weight).sum()
    }

    /// Pets delivered since the car was created.
    #[must_use]
    pub const fn total_serviced(&self) -> u64 {
        self.total_serviced
    }

    /// Whether the manifest is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// Whether `pet` fits within both the count and the weight limit.
    #[must_use]
    pub fn can_board(&self, pet: &Pet) -> bool {
        self.has_free_slot() && self.current_load() + pet.weight() <= self.max_weight
    }

    /// Whether another pet fits by count alone.
    #[must_use]
    pub fn has_free_slot(&self) -> bool {
        self.manifest.len() < self.max_pets
    }

    /// Whether any pet aboard is headed to `floor`.
    #[must_use]
    pub fn has_destination(&self, floor: usize) -> bool {
        self.manifest.iter().any(|pet| pet.destination() == floor)
    }

    /// Whether any pet aboard is headed strictly above `floor`.
    #[must_use]
    pub fn has_destination_above(&self, floor: usize) -> bool {
        self.manifest.iter().any(|pet| pet.destination() > floor)
    }

    /// Whether any pet aboard is headed strictly below `floor`.
    #[must_use]
    pub fn has_destination_below(&self, floor: usize) -> bool {
        self.manifest.iter().any(|pet| pet.destination() < floor)
    }

    pub(crate) const fn set_state(&mut self, state: CarState) {
        self.state = state;
    }

    pub(crate) const fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Put the car back at floor 1, facing up, idle. Counters survive.
    pub(crate) const fn reset_for_start(&mut self) {
        self.state = CarState::Idle;
        self.floor = 1;
        self.direction = Direction::Up;
    }

    /// Move one floor in `direction`, staying within `1..=top`.
    pub(crate) fn advance(&mut self, direction: Direction, top: usize) {
        self.floor = match direction {
            Direction::Up => (self.floor + 1).min(top),
            Direction::Down => self.floor.saturating_sub(1).max(1),
        };
    }

    /// Add a pet to the manifest. The caller has checked [`Car::can_board`].
    pub(crate) fn board(&mut self, pet: Pet) {
        debug_assert!(self.can_board(&pet), "boarding would exceed car limits");
        self.manifest.push(pet);
    }

    /// Remove every pet headed to the current floor and count them delivered.
    pub(crate) fn unload_current_floor(&mut self) -> Vec<Pet> {
        let floor = self.floor;
        let (delivered, aboard): (Vec<Pet>, Vec<Pet>) = std::mem::take(&mut self.manifest)
            .into_iter()
            .partition(|pet| pet.destination() == floor);
        self.manifest = aboard;
        self.total_serviced += delivered.len() as u64;
        delivered
    }

    /// Drop everything aboard without delivering it.
    pub(crate) fn discard_manifest(&mut self) -> usize {
        let dropped = self.manifest.len();
        self.manifest.clear();
        dropped
    }
}
