//! Floor-indexed FIFO queues of pets waiting for pickup.

use std::collections::VecDeque;

use crate::core::pet::{Pet, PetKind};
use crate::core::ElevatorError;

/// Request queue store: one FIFO queue per floor, floors numbered `1..=N`.
#[derive(Debug)]
pub struct FloorQueues {
    queues: Vec<VecDeque<Pet>>,
    max_waiting: usize,
}

impl FloorQueues {
    /// Create empty queues for `floors` floors, holding at most `max_waiting`
    /// pets in total.
    #[must_use]
    pub fn new(floors: usize, max_waiting: usize) -> Self {
        Self {
            queues: (0..floors).map(|_| VecDeque::new()).collect(),
            max_waiting,
        }
    }

    /// Number of floors (N).
    #[must_use]
    pub fn floor_count(&self) -> usize {
        self.queues.len()
    }

    /// Check a raw request and return `(origin, destination, kind)`.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` on an out-of-range floor, equal floors or unknown kind.
    pub fn validate(
        &self,
        origin: i32,
        destination: i32,
        kind: i32,
    ) -> Result<(usize, usize, PetKind), ElevatorError> {
        let origin = self.checked_floor(origin, "origin")?;
        let destination = self.checked_floor(destination, "destination")?;
        if origin == destination {
            return Err(ElevatorError::InvalidRequest(format!(
                "origin and destination are both floor {origin}"
            )));
        }
        let kind = PetKind::try_from(kind)?;
        Ok((origin, destination, kind))
    }

    fn checked_floor(&self, floor: i32, role: &str) -> Result<usize, ElevatorError> {
        usize::try_from(floor)
            .ok()
            .filter(|f| (1..=self.floor_count()).contains(f))
            .ok_or_else(|| {
                ElevatorError::InvalidRequest(format!(
                    "{role} floor {floor} outside 1..={}",
                    self.floor_count()
                ))
            })
    }

    /// Validate a request and append the new pet to its origin floor's queue.
    ///
    /// Nothing is mutated when an error is returned.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` on validation failure, `ResourceExhausted` when the
    /// store is full or queue memory cannot be reserved.
    pub fn submit(&mut self, origin: i32, destination: i32, kind: i32) -> Result<&Pet, ElevatorError> {
        let (origin, destination, kind) = self.validate(origin, destination, kind)?;
        if self.total_waiting() >= self.max_waiting {
            return Err(ElevatorError::ResourceExhausted(format!(
                "{} pets already waiting",
                self.max_waiting
            )));
        }
        let queue = &mut self.queues[origin - 1];
        queue
            .try_reserve(1)
            .map_err(|e| ElevatorError::ResourceExhausted(e.to_string()))?;
        queue.push_back(Pet::new(kind, origin, destination));
        Ok(&queue[queue.len() - 1])
    }

    /// True if any floor has a pet waiting.
    #[must_use]
    pub fn has_any_waiting(&self) -> bool {
        self.queues.iter().any(|q| !q.is_empty())
    }

    /// True if a floor strictly above `floor` has a pet waiting.
    #[must_use]
    pub fn has_waiting_above(&self, floor: usize) -> bool {
        self.queues.iter().skip(floor).any(|q| !q.is_empty())
    }

    /// True if a floor strictly below `floor` has a pet waiting.
    #[must_use]
    pub fn has_waiting_below(&self, floor: usize) -> bool {
        self.queues
            .iter()
            .take(floor.saturating_sub(1))
            .any(|q| !q.is_empty())
    }

    /// Pets waiting across all floors.
    #[must_use]
    pub fn total_waiting(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// Pets waiting on `floor` (0 for an unknown floor).
    #[must_use]
    pub fn waiting_at(&self, floor: usize) -> usize {
        self.queue(floor).map_or(0, VecDeque::len)
    }

    /// Pets waiting on `floor`, front first.
    pub fn iter_floor(&self, floor: usize) -> impl Iterator<Item = &Pet> + '_ {
        self.queue(floor).into_iter().flatten()
    }

    /// Front of `floor`'s queue.
    #[must_use]
    pub fn peek_front(&self, floor: usize) -> Option<&Pet> {
        self.queue(floor).and_then(VecDeque::front)
    }

    /// Remove and return the earliest pet on `floor` matching `predicate`.
    /// Pets ahead of it that do not match keep their place.
    pub fn pop_matching<F>(&mut self, floor: usize, mut predicate: F) -> Option<Pet>
    where
        F: FnMut(&Pet) -> bool,
    {
        let queue = self.queue_mut(floor)?;
        let index = queue.iter().position(|pet| predicate(pet))?;
        queue.remove(index)
    }

    /// Drop every waiting pet, returning how many were discarded.
    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.total_waiting();
        self.queues.iter_mut().for_each(VecDeque::clear);
        dropped
    }

    fn queue(&self, floor: usize) -> Option<&VecDeque<Pet>> {
        self.queues.get(floor.checked_sub(1)?)
    }

    fn queue_mut(&mut self, floor: usize) -> Option<&mut VecDeque<Pet>> {
        self.queues.get_mut(floor.checked_sub(1)?)
    }
}
