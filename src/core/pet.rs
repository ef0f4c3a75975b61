//! Pets: the weighted items the elevator carries.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ElevatorError;

/// Unique identifier assigned to a pet when its request is accepted.
pub type PetId = Uuid;

/// The closed set of pet kinds, each with a fixed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetKind {
    /// 3 lbs.
    Chihuahua,
    /// 14 lbs.
    Pug,
    /// 10 lbs.
    Pughuahua,
    /// 16 lbs.
    Dachshund,
}

impl PetKind {
    /// All kinds, ordered by wire code.
    pub const ALL: [Self; 4] = [Self::Chihuahua, Self::Pug, Self::Pughuahua, Self::Dachshund];

    /// Weight in lbs.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Chihuahua => 3,
            Self::Pug => 14,
            Self::Pughuahua => 10,
            Self::Dachshund => 16,
        }
    }

    /// Numeric code used by external callers.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Chihuahua => 0,
            Self::Pug => 1,
            Self::Pughuahua => 2,
            Self::Dachshund => 3,
        }
    }

    /// Single-letter tag used in the status dump.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Chihuahua => 'C',
            Self::Pug => 'P',
            Self::Pughuahua => 'H',
            Self::Dachshund => 'D',
        }
    }

    /// Weight of the heaviest kind.
    #[must_use]
    pub fn heaviest() -> u32 {
        Self::ALL.iter().map(|k| k.weight()).max().unwrap_or(0)
    }
}

impl TryFrom<i32> for PetKind {
    type Error = ElevatorError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| ElevatorError::InvalidRequest(format!("unknown pet kind {code}")))
    }
}

impl fmt::Display for PetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A pet waiting on a floor or riding the car.
///
/// Deliberately not `Clone`: a pet is moved between a floor queue and the
/// manifest, never copied. Use [`Pet::view`] for a detached description.
#[derive(Debug, PartialEq, Eq)]
pub struct Pet {
    id: PetId,
    kind: PetKind,
    origin: usize,
    destination: usize,
}

impl Pet {
    /// Create a pet. Floors are assumed to be validated by the caller.
    pub(crate) fn new(kind: PetKind, origin: usize, destination: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            origin,
            destination,
        }
    }

    /// Pet identifier.
    #[must_use]
    pub const fn id(&self) -> PetId {
        self.id
    }

    /// Pet kind.
    #[must_use]
    pub const fn kind(&self) -> PetKind {
        self.kind
    }

    /// Weight derived from the kind.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.kind.weight()
    }

    /// Floor the pet was picked up from.
    #[must_use]
    pub const fn origin(&self) -> usize {
        self.origin
    }

    /// Floor the pet is headed to.
    #[must_use]
    pub const fn destination(&self) -> usize {
        self.destination
    }

    /// Copyable description of this pet.
    #[must_use]
    pub const fn view(&self) -> PetView {
        PetView {
            id: self.id,
            kind: self.kind,
            origin: self.origin,
            destination: self.destination,
        }
    }
}

/// Detached, copyable description of a pet for status and audit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetView {
    /// Pet identifier.
    pub id: PetId,
    /// Pet kind.
    pub kind: PetKind,
    /// Pickup floor.
    pub origin: usize,
    /// Drop-off floor.
    pub destination: usize,
}

impl fmt::Display for PetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.symbol(), self.destination)
    }
}
