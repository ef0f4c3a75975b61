//! Elevator configuration: building size, car limits, timing and load policy.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, PetKind};

/// How the load pass treats a pet that would exceed the weight limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Leave the heavy pet queued and keep scanning for lighter ones behind it.
    #[default]
    SkipOverweight,
    /// End the scan at the first pet that does not fit.
    StopAtOverweight,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip_overweight" => Ok(Self::SkipOverweight),
            "stop_at_overweight" => Ok(Self::StopAtOverweight),
            other => Err(format!("unknown load policy `{other}`")),
        }
    }
}

/// Elevator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Number of floors, numbered `1..=floors`.
    pub floors: usize,
    /// Maximum pets aboard at once.
    pub max_pets: usize,
    /// Maximum total weight aboard, in lbs.
    pub max_weight: u32,
    /// Length of one simulated time unit in milliseconds.
    pub time_unit_ms: u64,
    /// Time units to travel one floor.
    pub transit_units: u32,
    /// Time units for one unload-and-load transfer.
    pub transfer_units: u32,
    /// Time units between scheduler re-polls when nothing signals it.
    pub poll_units: u32,
    /// Load pass behaviour for overweight pets.
    pub load_policy: LoadPolicy,
    /// Maximum pets waiting across all floors.
    pub max_waiting: usize,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            floors: 5,
            max_pets: 5,
            max_weight: 50,
            time_unit_ms: 1000,
            transit_units: 2,
            transfer_units: 1,
            poll_units: 1,
            load_policy: LoadPolicy::SkipOverweight,
            max_waiting: 1024,
        }
    }
}

impl ElevatorConfig {
    /// Default configuration: 5 floors, 5 pets, 50 lbs, one-second time unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of floors.
    #[must_use]
    pub const fn with_floors(mut self, floors: usize) -> Self {
        self.floors = floors;
        self
    }

    /// Set the pet count limit.
    #[must_use]
    pub const fn with_max_pets(mut self, max_pets: usize) -> Self {
        self.max_pets = max_pets;
        self
    }

    /// Set the weight limit.
    #[must_use]
    pub const fn with_max_weight(mut self, max_weight: u32) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Set the time unit length.
    #[must_use]
    pub const fn with_time_unit(mut self, unit: Duration) -> Self {
        self.time_unit_ms = unit.as_millis() as u64;
        self
    }

    /// Set the load policy.
    #[must_use]
    pub const fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    /// Set the waiting-pet bound.
    #[must_use]
    pub const fn with_max_waiting(mut self, max_waiting: usize) -> Self {
        self.max_waiting = max_waiting;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.floors < 2 {
            return Err("floors must be at least 2".into());
        }
        if self.max_pets == 0 {
            return Err("max_pets must be greater than 0".into());
        }
        if self.max_weight < PetKind::heaviest() {
            return Err(format!(
                "max_weight must be at least {} so an empty car can board any pet",
                PetKind::heaviest()
            ));
        }
        if self.time_unit_ms == 0 {
            return Err("time_unit_ms must be greater than 0".into());
        }
        if self.transit_units == 0 || self.transfer_units == 0 || self.poll_units == 0 {
            return Err("transit_units, transfer_units and poll_units must be greater than 0".into());
        }
        if self.max_waiting == 0 {
            return Err("max_waiting must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `PET_ELEVATOR_*` environment variables, after
    /// loading a `.env` file if one is present. Unset variables keep defaults.
    ///
    /// # Errors
    ///
    /// Fails when a variable does not parse or the result is invalid.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let mut cfg = Self::default();
        read_var("PET_ELEVATOR_FLOORS", &mut cfg.floors)?;
        read_var("PET_ELEVATOR_MAX_PETS", &mut cfg.max_pets)?;
        read_var("PET_ELEVATOR_MAX_WEIGHT", &mut cfg.max_weight)?;
        read_var("PET_ELEVATOR_TIME_UNIT_MS", &mut cfg.time_unit_ms)?;
        read_var("PET_ELEVATOR_TRANSIT_UNITS", &mut cfg.transit_units)?;
        read_var("PET_ELEVATOR_TRANSFER_UNITS", &mut cfg.transfer_units)?;
        read_var("PET_ELEVATOR_POLL_UNITS", &mut cfg.poll_units)?;
        read_var("PET_ELEVATOR_LOAD_POLICY", &mut cfg.load_policy)?;
        read_var("PET_ELEVATOR_MAX_WAITING", &mut cfg.max_waiting)?;
        cfg.validate()
            .map_err(anyhow::Error::msg)
            .context("invalid elevator configuration from environment")?;
        Ok(cfg)
    }

    fn units(&self, units: u32) -> Duration {
        Duration::from_millis(self.time_unit_ms.saturating_mul(u64::from(units)))
    }

    /// Floor-to-floor travel time.
    #[must_use]
    pub fn transit_delay(&self) -> Duration {
        self.units(self.transit_units)
    }

    /// Loading time for one transfer.
    #[must_use]
    pub fn transfer_delay(&self) -> Duration {
        self.units(self.transfer_units)
    }

    /// Scheduler wakeup timeout.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.units(self.poll_units)
    }
}

fn read_var<T>(name: &str, slot: &mut T) -> AppResult<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = env::var(name) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{name}={raw} is not valid"))?;
    }
    Ok(())
}
